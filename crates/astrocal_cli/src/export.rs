//! Event export: one ICS file per calendar, or a single JSON document.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use astrocal_search::Event;

/// Group events by their calendar name, preserving order within each.
pub fn group_by_calendar(events: &[Event]) -> BTreeMap<String, Vec<&Event>> {
    let mut groups: BTreeMap<String, Vec<&Event>> = BTreeMap::new();
    for event in events {
        groups.entry(event.calendar.clone()).or_default().push(event);
    }
    groups
}

/// Write the full event list as pretty JSON.
pub fn write_json(path: &Path, events: &[Event]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, events).context("serializing events")?;
    Ok(())
}

/// Write one calendar's events as an ICS file under `output_dir`.
///
/// Returns the path written. Minimal RFC 5545: UTC timestamps, escaped
/// text values, 75-octet line folding.
pub fn write_ics(output_dir: &Path, calendar_name: &str, events: &[&Event]) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//astrocal//event generator//EN");
    push_line(&mut out, &format!("X-WR-CALNAME:{}", escape_text(calendar_name)));

    for (i, event) in events.iter().enumerate() {
        push_line(&mut out, "BEGIN:VEVENT");
        let stamp = format_utc(event.start_time);
        push_line(&mut out, &format!("UID:{stamp}-{i}@astrocal"));
        push_line(&mut out, &format!("DTSTAMP:{stamp}"));
        push_line(&mut out, &format!("DTSTART:{stamp}"));
        if event.duration_minutes > 0 {
            push_line(&mut out, &format!("DTEND:{}", format_utc(event.end_time())));
        }
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.summary)));
        if !event.description.is_empty() {
            push_line(
                &mut out,
                &format!("DESCRIPTION:{}", escape_text(&event.description)),
            );
        }
        push_line(&mut out, "END:VEVENT");
    }
    push_line(&mut out, "END:VCALENDAR");

    let path = output_dir.join(format!("{}.ics", sanitize_filename(calendar_name)));
    fs::write(&path, out).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `YYYYMMDDTHHMMSSZ` per RFC 5545.
pub fn format_utc(t: DateTime<Utc>) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape text values: backslash, semicolon, comma, newline.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Fold content lines at 75 octets with a space continuation.
fn push_line(out: &mut String, line: &str) {
    const LIMIT: usize = 75;
    let bytes = line.as_bytes();
    if bytes.len() <= LIMIT {
        out.push_str(line);
    } else {
        let mut start = 0;
        let mut first = true;
        while start < bytes.len() {
            let mut end = (start + if first { LIMIT } else { LIMIT - 1 }).min(bytes.len());
            // Back off to a char boundary.
            while end < bytes.len() && !line.is_char_boundary(end) {
                end -= 1;
            }
            if !first {
                out.push(' ');
            }
            out.push_str(&line[start..end]);
            out.push_str("\r\n");
            start = end;
            first = false;
        }
        return;
    }
    out.push_str("\r\n");
}

/// Calendar name → safe filename, matching the original writer.
fn sanitize_filename(name: &str) -> String {
    name.replace(':', "").replace('/', "-").replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrocal_search::EventKind;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        Event {
            kind: EventKind::SolarEclipse,
            summary: "Partial Solar Eclipse".into(),
            start_time: Utc.with_ymd_and_hms(2024, 4, 8, 16, 42, 0).unwrap(),
            duration_minutes: 154,
            description: "Partial Solar Eclipse. Peak offset 0.345 deg.".into(),
            participants: vec!["sun".into(), "moon".into()],
            calendar: "Astro: Solar Eclipses".into(),
        }
    }

    #[test]
    fn dtstart_format() {
        let t = Utc.with_ymd_and_hms(2024, 4, 8, 16, 42, 5).unwrap();
        assert_eq!(format_utc(t), "20240408T164205Z");
    }

    #[test]
    fn text_escaping() {
        assert_eq!(escape_text("a,b;c\nd\\e"), "a\\,b\\;c\\nd\\\\e");
    }

    #[test]
    fn filename_sanitized() {
        assert_eq!(
            sanitize_filename("Astro: Solar Eclipses"),
            "Astro_Solar_Eclipses"
        );
    }

    #[test]
    fn ics_round_trip_structure() {
        let dir = std::env::temp_dir().join("astrocal_ics_test");
        let event = sample_event();
        let path = write_ics(&dir, "Astro: Solar Eclipses", &[&event]).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("BEGIN:VCALENDAR"));
        assert!(text.contains("DTSTART:20240408T164200Z"));
        assert!(text.contains("DTEND:20240408T191600Z"));
        assert!(text.contains("SUMMARY:Partial Solar Eclipse"));
        assert!(text.trim_end().ends_with("END:VCALENDAR"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn long_lines_folded() {
        let mut out = String::new();
        let long = format!("DESCRIPTION:{}", "x".repeat(200));
        push_line(&mut out, &long);
        for line in out.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {}", line.len());
        }
        // Unfolding restores the original content.
        let unfolded = out.replace("\r\n ", "");
        assert!(unfolded.starts_with(&long));
    }

    #[test]
    fn grouping_preserves_order() {
        let mut a = sample_event();
        a.calendar = "Astro: A".into();
        let mut b = sample_event();
        b.calendar = "Astro: B".into();
        let mut a2 = sample_event();
        a2.calendar = "Astro: A".into();
        a2.summary = "Second".into();

        let events = vec![a, b, a2];
        let groups = group_by_calendar(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Astro: A"].len(), 2);
        assert_eq!(groups["Astro: A"][1].summary, "Second");
    }
}
