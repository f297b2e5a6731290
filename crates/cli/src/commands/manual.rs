//! `wifispot manual`: predict from hand-entered readings.

use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

use wifispot_core::{AcquisitionMode, FeatureSchema, PartialObservation, RSSI_MAX, RSSI_MIN};

/// Value offered when a reading is prompted for and left blank.
pub const PROMPT_DEFAULT_DBM: f64 = -70.0;

/// Parse a `NAME=VALUE` reading from the command line.
pub fn parse_reading(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing access point name in '{s}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((name.to_string(), value))
}

/// Collect command-line readings, rejecting repeated names.
pub fn collect_readings(readings: Vec<(String, f64)>) -> Result<PartialObservation, String> {
    let mut partial = PartialObservation::new();
    for (name, value) in readings {
        if partial.get(&name).is_some() {
            return Err(format!("access point '{name}' given more than once"));
        }
        partial.insert(name, value);
    }
    Ok(partial)
}

/// Ask for every manual-entry feature not yet supplied.
fn prompt_missing(
    schema: &FeatureSchema,
    partial: &mut PartialObservation,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    for feature in schema.manual_features() {
        if partial.get(feature).is_some() {
            continue;
        }
        write!(
            output,
            "  {feature} [{RSSI_MIN}..{RSSI_MAX}] (Enter for {PROMPT_DEFAULT_DBM}): "
        )?;
        output.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let line = line.trim();
        let value = if line.is_empty() {
            PROMPT_DEFAULT_DBM
        } else {
            line.parse::<f64>()
                .map_err(|_| format!("'{line}' is not a number"))?
        };
        partial.insert(feature.clone(), value);
    }
    Ok(())
}

pub async fn run(
    config_path: &Path,
    readings: Vec<(String, f64)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = super::load_pipeline(config_path)?;
    let mut partial = collect_readings(readings)?;

    let stdin = std::io::stdin();
    if stdin.is_terminal() && partial.len() < pipeline.schema().manual_features().len() {
        println!("🖊️  Enter RSSI readings; the remaining access points are set to -100.");
        prompt_missing(
            pipeline.schema(),
            &mut partial,
            &mut stdin.lock(),
            &mut std::io::stdout(),
        )?;
    }

    let single = pipeline
        .run(AcquisitionMode::Manual(partial))?
        .into_single()
        .ok_or("manual mode did not produce a single prediction")?;
    println!("📌 Predicted spot: {}", single.spot);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_value_pairs() {
        assert_eq!(parse_reading("AP1=-65").unwrap(), ("AP1".to_string(), -65.0));
        assert_eq!(parse_reading(" AP2 = -70.5 ").unwrap(), ("AP2".to_string(), -70.5));
    }

    #[test]
    fn rejects_malformed_readings() {
        assert!(parse_reading("AP1").is_err());
        assert!(parse_reading("=-65").is_err());
        assert!(parse_reading("AP1=strong").is_err());
    }

    #[test]
    fn repeated_access_point_is_rejected() {
        let err = collect_readings(vec![("AP1".into(), -65.0), ("AP1".into(), -60.0)]).unwrap_err();
        assert!(err.contains("AP1"));
    }

    #[test]
    fn prompts_only_for_missing_features() {
        let schema = FeatureSchema::from_columns(["AP1", "AP2", "AP3", "spot"], "spot", 2).unwrap();
        let mut partial = PartialObservation::new().with("AP1", -65.0);
        let mut input = "-55\n".as_bytes();
        let mut output = Vec::new();

        prompt_missing(&schema, &mut partial, &mut input, &mut output).unwrap();

        assert_eq!(partial.get("AP1"), Some(-65.0));
        assert_eq!(partial.get("AP2"), Some(-55.0));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("AP2"));
        assert!(!shown.contains("AP1"));
    }

    #[test]
    fn blank_answer_uses_default() {
        let schema = FeatureSchema::from_columns(["AP1", "AP2", "spot"], "spot", 1).unwrap();
        let mut partial = PartialObservation::new();
        prompt_missing(&schema, &mut partial, &mut "\n".as_bytes(), &mut Vec::new()).unwrap();
        assert_eq!(partial.get("AP1"), Some(PROMPT_DEFAULT_DBM));
    }
}
