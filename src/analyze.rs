use std::fs;
use std::path::Path;

use plotly::common::{Fill, Mode, Title};
use plotly::layout::{Axis, HoverMode, Layout, RangeMode};
use plotly::{Plot, Scatter};

use crate::awr::{AwrCollection, Snapshot};
use crate::error::AwrError;
use crate::staticdata::{InstanceStat, LoadMetric, TimeModelStat, UnitFamily, WaitClass, TOP_SQL_LIMIT};
use crate::tools::{get_safe_id, mean, pearson_correlation_2v, round_to, std_deviation};

const PANEL_HEIGHT: usize = 450;
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// Which panels end up in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ArgEnum)]
pub enum ReportMode {
	Full,
	SqlOnly,
	IoOnly,
}

impl Default for ReportMode {
	fn default() -> Self {
		ReportMode::Full
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartOptions {
	pub mode: ReportMode,
	/// Divide every non load profile value by the snapshot's load profile DB Time.
	pub scale: bool,
}

/// One line of a panel, a point per snapshot. `None` leaves a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
	pub name: String,
	pub points: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
	pub title: String,
	pub y_title: String,
	pub series: Vec<Series>,
}

/// `value / db_time`, or a gap when DB Time is zero or unknown.
pub fn scale_by_db_time(value: f64, db_time: Option<f64>) -> Option<f64> {
	match db_time {
		Some(db_time) if db_time != 0.0 => Some(value / db_time),
		_ => None,
	}
}

struct PanelBuilder<'a> {
	snaps: Vec<&'a Snapshot>,
	scale: bool,
}

impl<'a> PanelBuilder<'a> {
	fn series(&self, name: &str, value: impl Fn(&Snapshot) -> Option<f64>) -> Series {
		let points = self
			.snaps
			.iter()
			.map(|snap| {
				let v = value(snap)?;
				if self.scale {
					scale_by_db_time(v, snap.load_profile.db_time)
				} else {
					Some(v)
				}
			})
			.collect();
		Series { name: name.to_string(), points }
	}

	/// Load profile values are already per second and are never scaled.
	fn profile_series(&self, metric: LoadMetric) -> Series {
		Series {
			name: metric.label().to_string(),
			points: self.snaps.iter().map(|snap| snap.load_profile.get(metric)).collect(),
		}
	}

	fn y_title(&self, unit: &str) -> String {
		if self.scale {
			format!("{} per DB Time", unit)
		} else {
			unit.to_string()
		}
	}

	fn wait_classes(&self, classes: &[WaitClass], with_db_time: bool) -> Panel {
		let mut series: Vec<Series> = classes
			.iter()
			.map(|class| self.series(class.label(), |s| Some(s.wait_classes.get(*class))))
			.collect();
		if with_db_time {
			series.push(self.series("DB Time", |s| Some(s.wait_classes.db_time)));
		}
		Panel { title: "Wait Class Time".to_string(), y_title: self.y_title("seconds"), series }
	}

	fn user_io_latency(&self) -> Panel {
		Panel {
			title: "User I/O average wait".to_string(),
			y_title: self.y_title("ms"),
			series: vec![self.series("User I/O avg wait", |s| s.user_io_avg_ms)],
		}
	}

	fn load_profile(&self, family: UnitFamily, metrics: &[LoadMetric]) -> Panel {
		let y_title = match family {
			UnitFamily::Time => "s/s",
			UnitFamily::Megabytes => "MB/s",
			UnitFamily::Blocks => "blocks/s",
			UnitFamily::Count => "per second",
		};
		Panel {
			title: family.title().to_string(),
			y_title: y_title.to_string(),
			series: metrics.iter().map(|m| self.profile_series(*m)).collect(),
		}
	}

	fn load_profile_family(&self, family: UnitFamily) -> Panel {
		let metrics: Vec<LoadMetric> = LoadMetric::ALL.into_iter().filter(|m| m.family() == family).collect();
		self.load_profile(family, &metrics)
	}

	fn host_cpu(&self) -> Panel {
		let cpu = |f: fn(&crate::awr::HostCpu) -> Option<f64>| move |s: &Snapshot| s.host_cpu.as_ref().and_then(f);
		Panel {
			title: "Host CPU".to_string(),
			y_title: self.y_title("%"),
			series: vec![
				self.series("%User", cpu(|c| Some(c.pct_user))),
				self.series("%System", cpu(|c| Some(c.pct_system))),
				self.series("%WIO", cpu(|c| Some(c.pct_wio))),
				self.series("%Idle", cpu(|c| c.pct_idle)),
				self.series("Load average (begin)", cpu(|c| c.load_avg_begin)),
				self.series("Load average (end)", cpu(|c| c.load_avg_end)),
			],
		}
	}

	fn time_model(&self) -> Panel {
		Panel {
			title: "Time Model Statistics".to_string(),
			y_title: self.y_title("seconds"),
			series: TimeModelStat::ALL
				.iter()
				.map(|stat| self.series(stat.label(), |s| s.time_model.get(stat).copied()))
				.collect(),
		}
	}

	fn instance_stats(&self) -> Panel {
		Panel {
			title: "Instance Activity".to_string(),
			y_title: self.y_title("per second"),
			series: InstanceStat::ALL
				.iter()
				.map(|stat| self.series(stat.label(), |s| s.instance_stats.get(stat).copied()))
				.collect(),
		}
	}

	fn top_sql(&self, sql_ids: &[String]) -> Panel {
		Panel {
			title: format!("Top {} SQL by elapsed time", sql_ids.len()),
			y_title: self.y_title("seconds"),
			series: sql_ids
				.iter()
				.map(|sql_id| self.series(sql_id, |s| s.sql_elapsed.get(sql_id).copied()))
				.collect(),
		}
	}
}

/// Panels for the chosen mode. Series without a single value and panels
/// without series are left out.
pub fn build_panels(collection: &AwrCollection, opts: ChartOptions) -> Vec<Panel> {
	let b = PanelBuilder { snaps: collection.iter().collect(), scale: opts.scale };
	let sql_ids = collection.top_sql_ids(TOP_SQL_LIMIT);

	let panels = match opts.mode {
		ReportMode::Full => vec![
			b.wait_classes(&WaitClass::ALL, true),
			b.user_io_latency(),
			b.load_profile_family(UnitFamily::Time),
			b.load_profile_family(UnitFamily::Megabytes),
			b.load_profile_family(UnitFamily::Blocks),
			b.load_profile_family(UnitFamily::Count),
			b.host_cpu(),
			b.time_model(),
			b.instance_stats(),
			b.top_sql(&sql_ids),
		],
		ReportMode::SqlOnly => vec![b.wait_classes(&[], true), b.top_sql(&sql_ids)],
		ReportMode::IoOnly => vec![
			b.wait_classes(&[WaitClass::UserIo, WaitClass::SystemIo], false),
			b.user_io_latency(),
			b.load_profile(
				UnitFamily::Megabytes,
				&[LoadMetric::ReadIo, LoadMetric::WriteIo, LoadMetric::RedoSize],
			),
			b.load_profile(
				UnitFamily::Count,
				&[
					LoadMetric::ReadIoRequests,
					LoadMetric::WriteIoRequests,
					LoadMetric::PhysicalReads,
					LoadMetric::PhysicalWrites,
				],
			),
		],
	};

	panels
		.into_iter()
		.map(|mut panel| {
			panel.series.retain(|s| s.points.iter().any(Option::is_some));
			panel
		})
		.filter(|panel| !panel.series.is_empty())
		.collect()
}

/// Mean, spread and correlation with DB Time of one wait class over all snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
	pub class: WaitClass,
	pub mean: Option<f64>,
	pub std_dev: Option<f64>,
	pub correlation: Option<f64>,
}

pub fn wait_class_summary(collection: &AwrCollection) -> Vec<ClassSummary> {
	let db_time: Vec<f64> = collection.iter().map(|s| s.wait_classes.db_time).collect();
	WaitClass::ALL
		.iter()
		.map(|class| {
			let values: Vec<f64> = collection.iter().map(|s| s.wait_classes.get(*class)).collect();
			ClassSummary {
				class: *class,
				mean: mean(&values),
				std_dev: std_deviation(&values),
				correlation: pearson_correlation_2v(&values, &db_time),
			}
		})
		.collect()
}

fn panel_plot(panel: &Panel, x_vals: &[String]) -> Plot {
	let mut plot = Plot::new();
	for series in &panel.series {
		let trace = Scatter::new(x_vals.to_vec(), series.points.clone())
			.mode(Mode::Lines)
			.fill(Fill::ToZeroY)
			.name(&series.name);
		plot.add_trace(trace);
	}
	let layout = Layout::new()
		.title(Title::new(&panel.title))
		.height(PANEL_HEIGHT)
		.hover_mode(HoverMode::X)
		.x_axis(Axis::new().title(Title::new("Snapshot")))
		.y_axis(
			Axis::new()
				.title(Title::new(&panel.y_title))
				.zero_line(true)
				.range_mode(RangeMode::ToZero),
		);
	plot.set_layout(layout);
	plot
}

fn fmt_opt(value: Option<f64>) -> String {
	value.map(|v| format!("{:.2}", round_to(v, 2))).unwrap_or_else(|| "-".to_string())
}

fn summary_table(summary: &[ClassSummary]) -> String {
	let mut rows = String::new();
	for s in summary {
		let strong = s.correlation.map_or(false, |c| c.abs() >= 0.5);
		let style = if strong { r#" style="color:red;font-weight:bold;""# } else { "" };
		rows.push_str(&format!(
			r#"<tr><td>{}</td><td>{}</td><td>{}</td><td{}>{}</td></tr>"#,
			s.class,
			fmt_opt(s.mean),
			fmt_opt(s.std_dev),
			style,
			fmt_opt(s.correlation)
		));
		rows.push('\n');
	}
	format!(
		r#"<table border="1" cellpadding="4" cellspacing="0">
<thead><tr><th>Wait Class</th><th>Mean (s)</th><th>Std Dev (s)</th><th>Correlation with DB Time</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
		rows
	)
}

/// Whole chart page: one plot per panel followed by the wait class summary.
pub fn render_html(collection: &AwrCollection, opts: ChartOptions, title: &str) -> String {
	let x_vals: Vec<String> = collection.snapshots.keys().map(|k| k.to_string()).collect();
	let mut plots = String::new();
	for panel in build_panels(collection, opts) {
		let div_id = get_safe_id(&panel.title);
		plots.push_str(&panel_plot(&panel, &x_vals).to_inline_html(Some(div_id.as_str())));
		plots.push('\n');
	}

	format!(
		r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <script src="{cdn}"></script>
    <style>
        body {{ font-family: Arial, sans-serif; padding: 1em; background: #fdfdfd; color: #333; }}
        table {{ border-collapse: collapse; margin-top: 2em; }}
        th {{ background: #f0f0f0; }}
    </style>
</head>
<body>
<h2>{title}</h2>
<p>{count} snapshot(s)</p>
{plots}
{table}
</body>
</html>"#,
		title = title,
		cdn = PLOTLY_CDN,
		count = collection.len(),
		plots = plots,
		table = summary_table(&wait_class_summary(collection)),
	)
}

pub fn plot_to_file(collection: &AwrCollection, path: &Path, opts: ChartOptions, title: &str) -> Result<(), AwrError> {
	let html = render_html(collection, opts, title);
	fs::write(path, html).map_err(|source| AwrError::Output { path: path.to_path_buf(), source })
}
