//! Text protocol of the `xinput` command line tool
//!
//! `xinput` has no machine readable output, so its listing format is treated
//! as an unversioned wire protocol. Everything that looks at that text lives
//! here, free of any process handling, so it can be tested against captured
//! output.
//!
//! A typical `xinput --list` line for a pointer looks like:
//!
//! ```text
//! ⎜   ↳ Logitech G Pro Gaming Mouse             	id=9	[slave  pointer  (2)]
//! ```

use crate::{DeviceRecord, MatchedDevice};
use tracing::debug;

/// Marker preceding the numeric device id
pub const ID_MARKER: &str = "id=";

/// Marker present on every pointer (master or slave) line
pub const POINTER_MARKER: &str = "pointer";

pub const LIST_FLAG: &str = "--list";
pub const LIST_PROPS_FLAG: &str = "--list-props";
pub const SET_PROP_FLAG: &str = "--set-prop";

/// Split raw listing output into one record per non-blank line
pub fn parse_records(output: &str) -> Vec<DeviceRecord> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(DeviceRecord::new)
        .collect()
}

/// Extract the device id following the first `id=` marker.
///
/// The id runs up to the first whitespace character. Returns `None` when the
/// marker is missing, the token is not a base-10 integer, or it is negative.
pub fn parse_device_id(line: &str) -> Option<MatchedDevice> {
    let start = line.find(ID_MARKER)? + ID_MARKER.len();
    let raw_id = line[start..]
        .split(char::is_whitespace)
        .next()
        .unwrap_or_default();

    let id = match raw_id.parse::<i64>() {
        Ok(id) => id,
        Err(e) => {
            debug!("Ignoring unparsable device id {:?}: {}", raw_id, e);
            return None;
        }
    };

    let id = u32::try_from(id).ok()?;
    Some(MatchedDevice {
        id,
        raw_id: raw_id.to_string(),
    })
}

/// Whether a listing line describes a pointer whose text contains `device`
pub fn is_candidate(record: &DeviceRecord, device: &str) -> bool {
    let line = &record.line;
    line.contains(ID_MARKER) && line.contains(POINTER_MARKER) && line.contains(device)
}

/// Select every pointer record mentioning `device` and pull out its id.
///
/// Matching is a plain case-sensitive substring test. Matches keep the order
/// of the listing and are not deduplicated.
pub fn match_devices(records: &[DeviceRecord], device: &str) -> Vec<MatchedDevice> {
    records
        .iter()
        .filter(|record| is_candidate(record, device))
        .filter_map(|record| parse_device_id(&record.line))
        .collect()
}

/// Split a configured property value into `--set-prop` arguments.
///
/// A value with a comma is split in two at the first comma; both halves are
/// trimmed and the first gets its trailing comma back (`"0, 1"` becomes
/// `["0,", "1"]`). Anything else is passed through as a single argument.
/// Numeric text is not normalized: `"0.000000,1"` gives `["0.000000,", "1"]`.
pub fn split_value(value: &str) -> Vec<String> {
    match value.split_once(',') {
        Some((first, second)) => vec![format!("{},", first.trim()), second.trim().to_string()],
        None => vec![value.to_string()],
    }
}

/// Whether a `--list-props` listing reports the fully qualified property
pub fn supports_property(listing: &str, qualified_name: &str) -> bool {
    listing.contains(qualified_name)
}

pub fn list_props_args(id: u32) -> Vec<String> {
    vec![LIST_PROPS_FLAG.to_string(), id.to_string()]
}

pub fn set_prop_args(id: u32, qualified_name: &str, values: &[String]) -> Vec<String> {
    let mut args = vec![
        SET_PROP_FLAG.to_string(),
        id.to_string(),
        qualified_name.to_string(),
    ];
    args.extend(values.iter().cloned());
    args
}
