//! Name badge export for Brother P-touch Editor.
//!
//! Badges are a CSV of attendee names plus a `.lbx` label file. An `.lbx` is a
//! zip archive whose `label.xml` references its merge database by path, so we
//! copy the user's template and repoint those references at our CSV. Opening
//! the result in P-touch Editor and choosing "Print All Records" prints one
//! badge per attendee.

use anyhow::{Context, Result, bail};
use regex::{Captures, NoExpand, Regex};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::roster::EventRoster;

/// Column names the label template merges on.
pub const BADGE_HEADERS: [&str; 3] = ["First Name", "Surname", "Company"];

/// Fixed file stem; P-touch remembers file access per path.
pub const BADGES_STEM: &str = "badges";

const LABEL_XML: &str = "label.xml";

/// Writes the badge merge CSV for a roster.
pub fn write_badges_csv(path: &Path, roster: &EventRoster) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(BADGE_HEADERS)?;
    for a in roster {
        writer.write_record([&a.first_name, &a.last_name, &a.company])?;
    }
    writer.flush()?;
    Ok(())
}

/// Points every database reference in a label's XML at `csv_path`.
pub fn rewrite_label_xml(xml: &str, csv_path: &str, csv_name: &str) -> Result<String> {
    let database_path = Regex::new(r#"databasePath="[^"]*""#)?;
    let merge_table = Regex::new(r#"mergeTable="[^"]*""#)?;
    let db_table = Regex::new(r#"(<database:dbTable name=")[^"]*(")"#)?;

    let xml = database_path.replace_all(xml, NoExpand(&format!(r#"databasePath="{csv_path}""#)));
    let xml = merge_table.replace_all(&xml, NoExpand(&format!(r#"mergeTable="{csv_name}""#)));
    let xml = db_table.replace_all(&xml, |caps: &Captures| {
        format!("{}{}{}", &caps[1], csv_name, &caps[2])
    });

    Ok(xml.into_owned())
}

/// Copies the `.lbx` at `template` to `out`, rewriting its `label.xml` to
/// merge from `csv_path`. Every other archive member is copied unchanged.
pub fn write_badge_label(template: &Path, csv_path: &Path, out: &Path) -> Result<()> {
    let file = File::open(template).with_context(|| format!("opening {}", template.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("{} is not a valid label file", template.display()))?;

    let mut label_xml = None;
    let mut members = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;

        if name == LABEL_XML {
            label_xml = Some(String::from_utf8(data).context("label.xml is not UTF-8")?);
        } else {
            members.push((name, data));
        }
    }

    let Some(label_xml) = label_xml else {
        bail!("{} has no {LABEL_XML}", template.display());
    };

    let abs_csv = csv_path
        .canonicalize()
        .with_context(|| format!("resolving {}", csv_path.display()))?;
    let csv_name = csv_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let xml = rewrite_label_xml(&label_xml, &abs_csv.to_string_lossy(), csv_name)?;

    let out_file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = ZipWriter::new(out_file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file(LABEL_XML, options)?;
    writer.write_all(xml.as_bytes())?;
    for (name, data) in members {
        writer.start_file(name, options)?;
        writer.write_all(&data)?;
    }
    writer.finish()?;

    debug!(out = %out.display(), "Badge label written");
    Ok(())
}

/// Writes `badges.csv` and, when `template` exists, `badges.lbx` into
/// `output_dir`. Returns the label path if one was written.
pub fn generate_badges(roster: &EventRoster, output_dir: &Path, template: &Path) -> Result<Option<PathBuf>> {
    let csv_path = output_dir.join(format!("{BADGES_STEM}.csv"));
    write_badges_csv(&csv_path, roster)?;
    info!(path = %csv_path.display(), badges = roster.len(), "Badge CSV written");

    if !template.exists() {
        info!(template = %template.display(), "Label template not found, skipping badge label");
        return Ok(None);
    }

    let label_path = output_dir.join(format!("{BADGES_STEM}.lbx"));
    write_badge_label(template, &csv_path, &label_path)?;
    info!(path = %label_path.display(), "Badge label written");
    Ok(Some(label_path))
}
