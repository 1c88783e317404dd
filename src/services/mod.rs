pub mod ticketing_api;
