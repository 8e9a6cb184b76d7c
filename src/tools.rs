use ndarray::Array2;
use ndarray_stats::CorrelationExt;
use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").unwrap());

/// Strips color codes so console messages can go to plain log files.
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").to_string()
}

pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Parses report numbers such as `1,234.5`. Returns `None` for anything else.
pub fn parse_number(token: &str) -> Option<f64> {
    let cleaned = token.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

//Calculate pearson correlation of 2 vectors and return simple result
pub fn pearson_correlation_2v(vec1: &[f64], vec2: &[f64]) -> Option<f64> {
    if vec1.len() != vec2.len() || vec1.len() < 2 {
        return None;
    }
    let rows: usize = 2;
    let cols: usize = vec1.len();

    let mut data: Vec<f64> = Vec::with_capacity(rows * cols);
    data.extend_from_slice(vec1);
    data.extend_from_slice(vec2);

    let a = Array2::from_shape_vec((rows, cols), data).ok()?;
    let crr = a.pearson_correlation().ok()?;

    // constant series give NaN
    Some(crr.row(0)[1]).filter(|c| c.is_finite())
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum: f64 = data.iter().sum::<f64>();
    let count: usize = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_deviation(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance: f64 = data
                .iter()
                .map(|value| {
                    let diff: f64 = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Turns a panel title into something usable as an HTML id.
pub fn get_safe_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_with_thousand_separators() {
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("-1.5"), Some(-1.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to(0.04999, 2), 0.05);
        assert_eq!(round_to(100.0, 2), 100.0);
    }

    #[test]
    fn correlation_of_linear_series_is_one() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        let c = pearson_correlation_2v(&a, &b).unwrap();
        assert!((c - 1.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_needs_two_varying_points() {
        assert_eq!(pearson_correlation_2v(&[1.0], &[1.0]), None);
        assert_eq!(pearson_correlation_2v(&[1.0, 2.0], &[3.0]), None);
        assert_eq!(pearson_correlation_2v(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn mean_and_deviation() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
        assert_eq!(std_deviation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), Some(2.0));
    }

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_ansi("\x1B[31mError\x1B[0m: boom"), "Error: boom");
    }

    #[test]
    fn safe_ids() {
        assert_eq!(get_safe_id("Load Profile (MB/s)"), "load_profile__mb_s_");
    }
}
