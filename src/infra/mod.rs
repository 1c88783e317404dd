pub mod eventbrite;
