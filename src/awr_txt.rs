// Line scanner for AWR / Statspack text reports.
//
// A report is read top to bottom exactly once. Header lines open and close
// sections, and rows are only interpreted inside the section they belong to.
// A single file may hold several snapshots: every "Begin Snap:" line closes
// the previous one.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::awr::{HostCpu, LoadProfile, SnapKey, Snapshot, WaitClassTotals};
use crate::error::AwrError;
use crate::staticdata::{
	event_class, load_metric_for_label, EventClass, InstanceStat, LoadMetric, TimeModelStat, WaitClass,
	BYTES_PER_MB, LEGACY_BLOCK_LABELS, LEGACY_EVENT_NAME_WIDTH, MODERN_BLOCK_LABELS, MODERN_LAYOUT_MIN,
	SQL_ID_LEN,
};
use crate::tools::{parse_number, round_to};

static RELEASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+(?:\.\d+){4}\b").unwrap());
static LONG_FIELDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
static HOST_CORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"Cores:\s*(\d+)").unwrap());

/// Lines searched for the release when it isn't where it is expected.
const HEADER_SCAN_LINES: usize = 40;
const SNAP_TIME_FORMAT: &str = "%d-%b-%y %H:%M:%S";
const SNAP_KEY_FORMAT: &str = "%Y%m%d:%H:%M";

type RowResult<T> = Result<T, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportLayout {
	/// Before 11.2.0.4: wait classes are summed from foreground wait events.
	Legacy,
	/// 11.2.0.4 and later: wait classes are read from their own table.
	Modern,
}

impl ReportLayout {
	pub fn from_version(version: &str) -> Option<ReportLayout> {
		let parts: Vec<u32> = version
			.split('.')
			.map(|p| p.parse::<u32>())
			.collect::<Result<_, _>>()
			.ok()?;
		if parts.len() != MODERN_LAYOUT_MIN.len() {
			return None;
		}
		if parts.as_slice() >= &MODERN_LAYOUT_MIN[..] {
			Some(ReportLayout::Modern)
		} else {
			Some(ReportLayout::Legacy)
		}
	}

	fn wait_section_header(self) -> &'static str {
		match self {
			ReportLayout::Legacy => "Foreground Wait Events",
			ReportLayout::Modern => "Wait Classes by Total Wait Time",
		}
	}

	fn block_labels(self) -> &'static [(&'static str, LoadMetric)] {
		match self {
			ReportLayout::Legacy => &LEGACY_BLOCK_LABELS,
			ReportLayout::Modern => &MODERN_BLOCK_LABELS,
		}
	}
}

/// Finds the five part release number (e.g. `19.0.0.0.0`). It normally sits on
/// the third line, or the seventh when the report opens with a WARNING banner.
pub fn detect_version(lines: &[&str]) -> Option<String> {
	let preferred = match lines.first() {
		Some(first) if first.trim_start().starts_with("WARNING") => 6,
		_ => 2,
	};
	let release_in = |line: &str| RELEASE.find(line).map(|m| m.as_str().to_string());
	lines
		.get(preferred)
		.and_then(|line| release_in(line))
		.or_else(|| lines.iter().take(HEADER_SCAN_LINES).find_map(|line| release_in(line)))
}

#[derive(Debug, Clone)]
pub struct ParsedReport {
	pub file: String,
	pub version: String,
	pub layout: ReportLayout,
	pub snapshots: Vec<Snapshot>,
	/// Snapshots that were dropped, with the reason.
	pub warnings: Vec<String>,
}

/// Scans the text of one report. `file` is only used for messages and as the
/// source of the snapshots.
pub fn parse_awr_text(file: &str, text: &str) -> Result<ParsedReport, AwrError> {
	let lines: Vec<&str> = text.lines().collect();
	let version = detect_version(&lines).ok_or_else(|| AwrError::VersionNotFound { file: file.to_string() })?;
	let layout = ReportLayout::from_version(&version).ok_or_else(|| AwrError::BadVersion {
		file: file.to_string(),
		version: version.clone(),
	})?;

	let mut scanner = ReportScanner::new(file, layout);
	for (idx, raw) in lines.iter().enumerate() {
		if let Err(reason) = scanner.scan_line(raw) {
			return Err(AwrError::Parse {
				file: file.to_string(),
				line_no: idx + 1,
				line: raw.trim_end().to_string(),
				version,
				reason,
			});
		}
	}
	scanner.finish_snapshot();

	Ok(ParsedReport {
		file: file.to_string(),
		version,
		layout,
		snapshots: scanner.snapshots,
		warnings: scanner.warnings,
	})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
	None,
	LoadProfile,
	WaitClasses,
	HostCpu,
	TimeModel,
	InstanceStats,
	TopSql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
	BeginSnap,
	EndSnap,
	DbTime,
	Elapsed,
	LoadProfileStart,
	WaitClassesStart,
	HostCpuStart,
	TimeModelStart,
	InstanceStatsStart,
	SectionEnd,
	TopSqlHeader,
	Body,
}

/// Headers of sections that follow the ones we read.
const SECTION_ENDS: [&str; 7] = [
	"Instance Efficiency",
	"Background Wait Events",
	"Wait Event Histogram",
	"Instance CPU",
	"Operating System Statistics",
	"IOStat",
	"IO Stat",
];

/// Column order of the Host CPU data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CpuColumns {
	/// `... %User %System %WIO %Idle`
	Percent,
	/// 10g: `Begin End User System Idle WIO WCPU`
	WaitCpu,
}

struct SnapshotBuilder {
	snapshot: Snapshot,
	/// "DB Time:" from the header, in seconds.
	header_db_time: Option<f64>,
	/// "Elapsed:" from the header, in seconds.
	elapsed: Option<f64>,
	cores: Option<u32>,
	cpu_columns: CpuColumns,
	instance_stats_seen: bool,
}

impl SnapshotBuilder {
	fn new(snapshot: Snapshot) -> Self {
		SnapshotBuilder {
			snapshot,
			header_db_time: None,
			elapsed: None,
			cores: None,
			cpu_columns: CpuColumns::Percent,
			instance_stats_seen: false,
		}
	}

	/// DB Time comes from the header; without it the per-second load profile
	/// value is multiplied by the elapsed time. A snapshot with neither is dropped.
	fn finish(self) -> Result<Snapshot, String> {
		let mut snapshot = self.snapshot;
		let profile_db_time = match (snapshot.load_profile.db_time, self.elapsed) {
			(Some(per_second), Some(elapsed)) => Some(per_second * elapsed),
			_ => None,
		};
		match self.header_db_time.or(profile_db_time) {
			Some(db_time) => {
				snapshot.wait_classes.db_time = db_time;
				Ok(snapshot)
			}
			None => Err(format!("snapshot {} in {} has no DB Time and was skipped", snapshot.key, snapshot.source)),
		}
	}
}

struct ReportScanner<'a> {
	file: &'a str,
	layout: ReportLayout,
	section: Section,
	/// Non-blank lines seen since the load profile header.
	load_profile_rows: usize,
	/// Set once the top SQL table was closed; later copies in the file are ignored.
	top_sql_done: bool,
	current: Option<SnapshotBuilder>,
	snapshots: Vec<Snapshot>,
	warnings: Vec<String>,
}

impl<'a> ReportScanner<'a> {
	fn new(file: &'a str, layout: ReportLayout) -> Self {
		ReportScanner {
			file,
			layout,
			section: Section::None,
			load_profile_rows: 0,
			top_sql_done: false,
			current: None,
			snapshots: Vec::new(),
			warnings: Vec::new(),
		}
	}

	fn classify(&self, line: &str) -> LineKind {
		let trimmed = line.trim_start();
		if line.contains("Begin Snap:") {
			LineKind::BeginSnap
		} else if line.contains("End Snap:") {
			LineKind::EndSnap
		} else if trimmed.starts_with("DB Time:") || trimmed.starts_with("DB time:") {
			LineKind::DbTime
		} else if trimmed.starts_with("Elapsed:") {
			LineKind::Elapsed
		} else if line.starts_with("Load Profile") {
			LineKind::LoadProfileStart
		} else if line.starts_with(self.layout.wait_section_header()) {
			LineKind::WaitClassesStart
		} else if line.contains("Host CPU") {
			LineKind::HostCpuStart
		} else if line.starts_with("Time Model Statistics") {
			LineKind::TimeModelStart
		} else if line.starts_with("Instance Activity Stats") {
			LineKind::InstanceStatsStart
		} else if SECTION_ENDS.iter().any(|end| line.starts_with(end)) {
			LineKind::SectionEnd
		} else if line.contains("SQL ordered by") {
			LineKind::TopSqlHeader
		} else {
			LineKind::Body
		}
	}

	fn scan_line(&mut self, raw: &str) -> RowResult<()> {
		// page breaks show up as a form feed in front of section headers
		let line = raw.trim_start_matches('\u{c}').trim_end();

		match self.classify(line) {
			LineKind::BeginSnap => self.begin_snap(line),
			LineKind::EndSnap => self.end_snap(line),
			LineKind::DbTime => {
				let minutes = header_minutes(line)?;
				if let Some(builder) = self.current.as_mut() {
					builder.header_db_time = Some(minutes * 60.0);
				}
				Ok(())
			}
			LineKind::Elapsed => {
				let minutes = header_minutes(line)?;
				if let Some(builder) = self.current.as_mut() {
					builder.elapsed = Some(minutes * 60.0);
				}
				Ok(())
			}
			LineKind::LoadProfileStart => {
				self.section = Section::LoadProfile;
				self.load_profile_rows = 0;
				Ok(())
			}
			LineKind::WaitClassesStart => {
				if self.layout == ReportLayout::Legacy {
					if let Some(builder) = self.current.as_mut() {
						builder.snapshot.wait_classes.reset_classes();
					}
				}
				self.section = Section::WaitClasses;
				Ok(())
			}
			LineKind::HostCpuStart => {
				if let Some(builder) = self.current.as_mut() {
					if builder.snapshot.host_cpu.is_some() {
						return Ok(());
					}
					if let Some(cores) = HOST_CORES.captures(line).and_then(|c| c[1].parse::<u32>().ok()) {
						builder.cores = Some(cores);
					}
				}
				self.section = Section::HostCpu;
				Ok(())
			}
			LineKind::TimeModelStart => {
				self.section = Section::TimeModel;
				Ok(())
			}
			LineKind::InstanceStatsStart => {
				// only the first table; "- Absolute Values" and friends follow it
				self.section = match self.current.as_mut() {
					Some(builder) if !builder.instance_stats_seen => {
						builder.instance_stats_seen = true;
						Section::InstanceStats
					}
					_ => Section::None,
				};
				Ok(())
			}
			LineKind::SectionEnd => {
				self.section = Section::None;
				Ok(())
			}
			LineKind::TopSqlHeader => {
				self.top_sql_header(line);
				Ok(())
			}
			LineKind::Body => self.scan_row(line),
		}
	}

	/// The first "SQL ordered by Elapsed" opens the top SQL table. Seeing it
	/// again, or any other "SQL ordered by" table, closes it for the rest of the file.
	fn top_sql_header(&mut self, line: &str) {
		if self.section == Section::TopSql {
			self.top_sql_done = true;
			self.section = Section::None;
		} else if line.contains("SQL ordered by Elapsed") && !self.top_sql_done && self.current.is_some() {
			self.section = Section::TopSql;
		} else {
			self.section = Section::None;
		}
	}

	fn begin_snap(&mut self, line: &str) -> RowResult<()> {
		self.finish_snapshot();
		self.section = Section::None;

		let tokens: Vec<&str> = line.split_whitespace().collect();
		let snap_id = field(&tokens, 2)?;
		if !snap_id.chars().all(|c| c.is_ascii_digit()) {
			return Err(format!("snapshot id '{}' is not a number", snap_id));
		}
		let stamp = format!("{} {}", field(&tokens, 3)?, field(&tokens, 4)?);
		let taken = NaiveDateTime::parse_from_str(&stamp, SNAP_TIME_FORMAT)
			.map_err(|e| format!("can't read snapshot time '{}': {}", stamp, e))?;

		let key = SnapKey::new(taken.format(SNAP_KEY_FORMAT).to_string(), snap_id);
		let mut snapshot = Snapshot::new(key, self.file);
		if let Some(sessions) = tokens.get(5) {
			snapshot.load_profile.set(LoadMetric::BeginSessions, number(sessions)?);
		}
		self.current = Some(SnapshotBuilder::new(snapshot));
		Ok(())
	}

	fn end_snap(&mut self, line: &str) -> RowResult<()> {
		let builder = self.current.as_mut().ok_or_else(|| "End Snap line without a Begin Snap".to_string())?;
		let tokens: Vec<&str> = line.split_whitespace().collect();
		if let Some(sessions) = tokens.get(5) {
			builder.snapshot.load_profile.set(LoadMetric::EndSessions, number(sessions)?);
		}
		Ok(())
	}

	fn finish_snapshot(&mut self) {
		if let Some(builder) = self.current.take() {
			match builder.finish() {
				Ok(snapshot) => self.snapshots.push(snapshot),
				Err(warning) => self.warnings.push(warning),
			}
		}
	}

	fn scan_row(&mut self, line: &str) -> RowResult<()> {
		if self.section == Section::None || line.trim().is_empty() {
			return Ok(());
		}
		let layout = self.layout;
		let builder = self
			.current
			.as_mut()
			.ok_or_else(|| "section row found before any Begin Snap line".to_string())?;
		let snapshot = &mut builder.snapshot;

		match self.section {
			Section::None => Ok(()),
			Section::LoadProfile => {
				self.load_profile_rows += 1;
				// the row under the header is its underline
				if self.load_profile_rows == 1 {
					return Ok(());
				}
				load_profile_row(line, layout, &mut snapshot.load_profile)
			}
			Section::WaitClasses => match layout {
				ReportLayout::Modern => wait_class_row(line, &mut snapshot.wait_classes, &mut snapshot.user_io_avg_ms),
				ReportLayout::Legacy => wait_event_row(line, &mut snapshot.wait_classes),
			},
			Section::HostCpu => {
				if line.contains("WCPU") {
					builder.cpu_columns = CpuColumns::WaitCpu;
					return Ok(());
				}
				if let Some(host_cpu) = host_cpu_row(line, layout, builder.cpu_columns, builder.cores)? {
					builder.snapshot.host_cpu = Some(host_cpu);
					self.section = Section::None;
				}
				Ok(())
			}
			Section::TimeModel => counter_row(
				line,
				TimeModelStat::ALL.iter().map(|s| (*s, s.label())),
				0,
				&mut snapshot.time_model,
			),
			Section::InstanceStats => counter_row(
				line,
				InstanceStat::ALL.iter().map(|s| (*s, s.label())),
				1,
				&mut snapshot.instance_stats,
			),
			Section::TopSql => {
				top_sql_row(line, &mut snapshot.sql_elapsed);
				Ok(())
			}
		}
	}
}

fn field<'t>(tokens: &[&'t str], idx: usize) -> RowResult<&'t str> {
	tokens.get(idx).copied().ok_or_else(|| format!("expected at least {} fields", idx + 1))
}

fn number(token: &str) -> RowResult<f64> {
	parse_number(token).ok_or_else(|| format!("expected a number, found '{}'", token))
}

/// Value of "Elapsed:" / "DB Time:" lines, printed in minutes.
fn header_minutes(line: &str) -> RowResult<f64> {
	let value = line
		.split_once(':')
		.and_then(|(_, rest)| rest.split_whitespace().next())
		.ok_or_else(|| "no value after the colon".to_string())?;
	number(value)
}

/// Drops a trailing unit such as "(blocks)" or "(s)" from a load profile label.
fn strip_unit(label: &str) -> &str {
	if label.ends_with(')') {
		if let Some(open) = label.rfind('(') {
			return label[..open].trim_end();
		}
	}
	label
}

fn load_profile_row(line: &str, layout: ReportLayout, profile: &mut LoadProfile) -> RowResult<()> {
	let Some((label, rest)) = line.split_once(':') else {
		return Ok(());
	};
	let label = strip_unit(label.trim());
	let Some(metric) = load_metric_for_label(label, layout.block_labels()) else {
		return Ok(());
	};
	let token = rest
		.split_whitespace()
		.next()
		.ok_or_else(|| format!("no per second value for '{}'", label))?;
	let mut value = number(token)?;
	if metric == LoadMetric::RedoSize {
		value = round_to(value / BYTES_PER_MB, 2);
	}
	profile.set(metric, value);
	Ok(())
}

/// Average wait as printed in the wait class table, converted to milliseconds.
/// Newer releases append a unit ("1.23ms", "850.12us", "1.02s"); older ones print plain ms.
fn avg_wait_ms(token: &str) -> RowResult<f64> {
	if let Some(ms) = token.strip_suffix("ms") {
		number(ms)
	} else if let Some(us) = token.strip_suffix("us") {
		Ok(number(us)? / 1000.0)
	} else if let Some(s) = token.strip_suffix('s') {
		Ok(number(s)? * 1000.0)
	} else {
		number(token)
	}
}

/// Row of the "Wait Classes by Total Wait Time" table:
/// `User I/O   12,345   234   18.96ms ...`
fn wait_class_row(line: &str, waits: &mut WaitClassTotals, user_io_avg_ms: &mut Option<f64>) -> RowResult<()> {
	let tokens: Vec<&str> = line.split_whitespace().collect();
	if tokens.len() < 3 || !line.starts_with(tokens[0]) {
		return Ok(());
	}
	if let Some(class) = WaitClass::from_label(&format!("{} {}", tokens[0], tokens[1])) {
		waits.set(class, number(field(&tokens, 3)?)?);
		if class == WaitClass::UserIo {
			*user_io_avg_ms = Some(avg_wait_ms(field(&tokens, 4)?)?);
		}
	} else if let Some(class) = WaitClass::from_label(tokens[0]) {
		waits.set(class, number(tokens[2])?);
	}
	Ok(())
}

/// Row of the legacy "Foreground Wait Events" table. The event name is cut at
/// a fixed width, the columns after it are waits, %time-outs and total seconds.
fn wait_event_row(line: &str, waits: &mut WaitClassTotals) -> RowResult<()> {
	let name_end = line
		.char_indices()
		.nth(LEGACY_EVENT_NAME_WIDTH)
		.map_or(line.len(), |(idx, _)| idx);
	let (name, rest) = line.split_at(name_end);
	let name = name.trim();
	if name.is_empty() {
		return Ok(());
	}
	let columns: Vec<&str> = rest.split_whitespace().collect();
	if columns.len() < 3 || parse_number(columns[0]).is_none() {
		return Ok(());
	}
	let total = number(columns[2])?;
	if let Some(class) = event_class(name).and_then(EventClass::summed_class) {
		waits.add(class, total);
	}
	Ok(())
}

/// Data row of the Host CPU table, split on runs of two or more blanks.
/// Returns `None` for the header and underline rows.
fn host_cpu_row(
	line: &str,
	layout: ReportLayout,
	columns: CpuColumns,
	header_cores: Option<u32>,
) -> RowResult<Option<HostCpu>> {
	let mut long: Vec<&str> = LONG_FIELDS.split(line).map(str::trim).collect();
	// keep column positions the same for rows without leading indentation
	if long.first().map_or(false, |first| !first.is_empty()) {
		long.insert(0, "");
	}
	if long.len() <= 5 || parse_number(long[1]).is_none() {
		return Ok(None);
	}
	let n = long.len();
	let row_cores = |present: bool| if present { long[2].parse::<u32>().ok() } else { None };

	let host_cpu = match (layout, columns) {
		// Begin End User System Idle WIO WCPU, cores only in the header
		(_, CpuColumns::WaitCpu) => {
			if n < 8 {
				return Err(format!("expected 7 Host CPU columns, found {}", n - 1));
			}
			let at = n - 7;
			HostCpu {
				cores: header_cores,
				load_avg_begin: Some(number(long[at])?),
				load_avg_end: Some(number(long[at + 1])?),
				pct_user: number(long[at + 2])?,
				pct_system: number(long[at + 3])?,
				pct_idle: Some(number(long[at + 4])?),
				pct_wio: number(long[at + 5])?,
			}
		}
		// CPUs Cores Sockets | Load Average Begin End | %User %System %WIO %Idle
		(ReportLayout::Modern, CpuColumns::Percent) if n == 10 => HostCpu {
			cores: row_cores(true).or(header_cores),
			pct_user: number(long[6])?,
			pct_system: number(long[7])?,
			pct_wio: number(long[8])?,
			..HostCpu::default()
		},
		// load averages left blank (Windows): percentages are the last four
		(ReportLayout::Modern, CpuColumns::Percent) => HostCpu {
			cores: row_cores(n - 1 >= 7).or(header_cores),
			pct_user: number(long[n - 4])?,
			pct_system: number(long[n - 3])?,
			pct_wio: number(long[n - 2])?,
			..HostCpu::default()
		},
		// optional CPU counts, then Begin End %User %System %WIO %Idle
		(ReportLayout::Legacy, CpuColumns::Percent) => {
			if n < 7 {
				return Err(format!("expected at least 6 Host CPU columns, found {}", n - 1));
			}
			let at = n - 6;
			HostCpu {
				cores: row_cores(n >= 9).or(header_cores),
				load_avg_begin: Some(number(long[at])?),
				load_avg_end: Some(number(long[at + 1])?),
				pct_user: number(long[at + 2])?,
				pct_system: number(long[at + 3])?,
				pct_wio: number(long[at + 4])?,
				pct_idle: Some(number(long[at + 5])?),
			}
		}
	};
	Ok(Some(host_cpu))
}

/// Time model / instance activity row. The statistic name must match a
/// counter as a whole; the value is `offset` columns after the name.
fn counter_row<K: Ord>(
	line: &str,
	counters: impl Iterator<Item = (K, &'static str)>,
	offset: usize,
	values: &mut BTreeMap<K, f64>,
) -> RowResult<()> {
	let tokens: Vec<&str> = line.split_whitespace().collect();
	let trimmed = line.trim_start();
	for (key, label) in counters {
		let Some(rest) = trimmed.strip_prefix(label) else {
			continue;
		};
		// "physical reads direct (lob)" is not "physical reads direct"
		let name_ends = rest.starts_with("  ")
			|| (rest.starts_with(' ') && rest.split_whitespace().next().and_then(parse_number).is_some());
		if !name_ends {
			continue;
		}
		let name_len = label.split_whitespace().count();
		values.insert(key, number(field(&tokens, name_len + offset)?)?);
		return Ok(());
	}
	Ok(())
}

/// Row of "SQL ordered by Elapsed Time": seven columns, elapsed seconds first
/// and the 13 character SQL id last.
fn top_sql_row(line: &str, sql_elapsed: &mut BTreeMap<String, f64>) {
	let tokens: Vec<&str> = line.split_whitespace().collect();
	if tokens.len() != 7 {
		return;
	}
	let sql_id = tokens[6];
	if sql_id.chars().count() != SQL_ID_LEN || sql_id.starts_with('-') {
		return;
	}
	if let Some(elapsed) = parse_number(tokens[0]) {
		*sql_elapsed.entry(sql_id.to_string()).or_insert(0.0) += elapsed;
	}
}
