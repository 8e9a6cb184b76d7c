use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::*;
use serde::{Serialize, Serializer};

use crate::awr_txt::{self, ParsedReport};
use crate::error::AwrError;
use crate::staticdata::{InstanceStat, LoadMetric, TimeModelStat, WaitClass};

/// Identity of a snapshot: its begin time (`YYYYMMDD:HH:MM`) and begin snap id.
/// Orders by time first, so a collection reads chronologically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapKey {
	pub timestamp: String,
	pub snap_id: String,
}

impl SnapKey {
	pub fn new(timestamp: impl Into<String>, snap_id: impl Into<String>) -> Self {
		SnapKey { timestamp: timestamp.into(), snap_id: snap_id.into() }
	}
}

impl fmt::Display for SnapKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.timestamp, self.snap_id)
	}
}

impl Serialize for SnapKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// Seconds spent per wait class plus DB Time, all in seconds.
#[derive(Default, Serialize, Debug, Clone, PartialEq)]
pub struct WaitClassTotals {
	pub system_io: f64,
	pub user_io: f64,
	pub cluster: f64,
	pub concurrency: f64,
	pub administrative: f64,
	pub application: f64,
	pub network: f64,
	pub commit: f64,
	pub configuration: f64,
	pub other: f64,
	pub db_time: f64,
}

impl WaitClassTotals {
	pub fn get(&self, class: WaitClass) -> f64 {
		match class {
			WaitClass::SystemIo => self.system_io,
			WaitClass::UserIo => self.user_io,
			WaitClass::Cluster => self.cluster,
			WaitClass::Concurrency => self.concurrency,
			WaitClass::Administrative => self.administrative,
			WaitClass::Application => self.application,
			WaitClass::Network => self.network,
			WaitClass::Commit => self.commit,
			WaitClass::Configuration => self.configuration,
			WaitClass::Other => self.other,
		}
	}

	fn slot(&mut self, class: WaitClass) -> &mut f64 {
		match class {
			WaitClass::SystemIo => &mut self.system_io,
			WaitClass::UserIo => &mut self.user_io,
			WaitClass::Cluster => &mut self.cluster,
			WaitClass::Concurrency => &mut self.concurrency,
			WaitClass::Administrative => &mut self.administrative,
			WaitClass::Application => &mut self.application,
			WaitClass::Network => &mut self.network,
			WaitClass::Commit => &mut self.commit,
			WaitClass::Configuration => &mut self.configuration,
			WaitClass::Other => &mut self.other,
		}
	}

	pub fn set(&mut self, class: WaitClass, seconds: f64) {
		*self.slot(class) = seconds;
	}

	pub fn add(&mut self, class: WaitClass, seconds: f64) {
		*self.slot(class) += seconds;
	}

	/// Zeroes the ten classes, DB Time is left alone.
	pub fn reset_classes(&mut self) {
		for class in WaitClass::ALL {
			self.set(class, 0.0);
		}
	}
}

/// Per-second load profile. Redo size, read/write IO and work area are in MB.
#[derive(Default, Serialize, Debug, Clone, PartialEq)]
pub struct LoadProfile {
	pub db_time: Option<f64>,
	pub db_cpu: Option<f64>,
	pub background_cpu: Option<f64>,
	pub redo_size_mb: Option<f64>,
	pub read_io_mb: Option<f64>,
	pub write_io_mb: Option<f64>,
	pub sql_work_area_mb: Option<f64>,
	pub logical_reads: Option<f64>,
	pub physical_reads: Option<f64>,
	pub physical_writes: Option<f64>,
	pub block_changes: Option<f64>,
	pub user_calls: Option<f64>,
	pub parses: Option<f64>,
	pub hard_parses: Option<f64>,
	pub logons: Option<f64>,
	pub executes: Option<f64>,
	pub rollbacks: Option<f64>,
	pub transactions: Option<f64>,
	pub read_io_requests: Option<f64>,
	pub write_io_requests: Option<f64>,
	pub begin_sessions: Option<f64>,
	pub end_sessions: Option<f64>,
}

impl LoadProfile {
	pub fn get(&self, metric: LoadMetric) -> Option<f64> {
		use LoadMetric::*;
		match metric {
			DbTime => self.db_time,
			DbCpu => self.db_cpu,
			BackgroundCpu => self.background_cpu,
			RedoSize => self.redo_size_mb,
			ReadIo => self.read_io_mb,
			WriteIo => self.write_io_mb,
			SqlWorkArea => self.sql_work_area_mb,
			LogicalReads => self.logical_reads,
			PhysicalReads => self.physical_reads,
			PhysicalWrites => self.physical_writes,
			BlockChanges => self.block_changes,
			UserCalls => self.user_calls,
			Parses => self.parses,
			HardParses => self.hard_parses,
			Logons => self.logons,
			Executes => self.executes,
			Rollbacks => self.rollbacks,
			Transactions => self.transactions,
			ReadIoRequests => self.read_io_requests,
			WriteIoRequests => self.write_io_requests,
			BeginSessions => self.begin_sessions,
			EndSessions => self.end_sessions,
		}
	}

	pub fn set(&mut self, metric: LoadMetric, value: f64) {
		use LoadMetric::*;
		let slot = match metric {
			DbTime => &mut self.db_time,
			DbCpu => &mut self.db_cpu,
			BackgroundCpu => &mut self.background_cpu,
			RedoSize => &mut self.redo_size_mb,
			ReadIo => &mut self.read_io_mb,
			WriteIo => &mut self.write_io_mb,
			SqlWorkArea => &mut self.sql_work_area_mb,
			LogicalReads => &mut self.logical_reads,
			PhysicalReads => &mut self.physical_reads,
			PhysicalWrites => &mut self.physical_writes,
			BlockChanges => &mut self.block_changes,
			UserCalls => &mut self.user_calls,
			Parses => &mut self.parses,
			HardParses => &mut self.hard_parses,
			Logons => &mut self.logons,
			Executes => &mut self.executes,
			Rollbacks => &mut self.rollbacks,
			Transactions => &mut self.transactions,
			ReadIoRequests => &mut self.read_io_requests,
			WriteIoRequests => &mut self.write_io_requests,
			BeginSessions => &mut self.begin_sessions,
			EndSessions => &mut self.end_sessions,
		};
		*slot = Some(value);
	}
}

/// Host CPU utilisation. Newer reports only give user, system and wio;
/// load averages and idle are filled for older releases.
#[derive(Default, Serialize, Debug, Clone, PartialEq)]
pub struct HostCpu {
	pub cores: Option<u32>,
	pub load_avg_begin: Option<f64>,
	pub load_avg_end: Option<f64>,
	pub pct_user: f64,
	pub pct_system: f64,
	pub pct_wio: f64,
	pub pct_idle: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
	pub key: SnapKey,
	/// Report file this snapshot came from.
	pub source: String,
	pub wait_classes: WaitClassTotals,
	pub load_profile: LoadProfile,
	pub host_cpu: Option<HostCpu>,
	pub time_model: BTreeMap<TimeModelStat, f64>,
	pub instance_stats: BTreeMap<InstanceStat, f64>,
	/// Elapsed seconds per SQL id, summed over the report's rows.
	pub sql_elapsed: BTreeMap<String, f64>,
	pub user_io_avg_ms: Option<f64>,
}

impl Snapshot {
	/// Empty snapshot with every time model and instance counter set to zero.
	pub fn new(key: SnapKey, source: impl Into<String>) -> Self {
		Snapshot {
			key,
			source: source.into(),
			wait_classes: WaitClassTotals::default(),
			load_profile: LoadProfile::default(),
			host_cpu: None,
			time_model: TimeModelStat::ALL.iter().map(|s| (*s, 0.0)).collect(),
			instance_stats: InstanceStat::ALL.iter().map(|s| (*s, 0.0)).collect(),
			sql_elapsed: BTreeMap::new(),
			user_io_avg_ms: None,
		}
	}
}

/// All snapshots of a run, keyed and ordered by [`SnapKey`].
#[derive(Default, Serialize, Debug, Clone, PartialEq)]
pub struct AwrCollection {
	pub snapshots: BTreeMap<SnapKey, Snapshot>,
}

impl AwrCollection {
	/// Stores a snapshot, returning the record it replaced. A later report
	/// describing the same snapshot wins as a whole.
	pub fn insert(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
		self.snapshots.insert(snapshot.key.clone(), snapshot)
	}

	pub fn len(&self) -> usize {
		self.snapshots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snapshots.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
		self.snapshots.values()
	}

	pub fn sql_totals(&self) -> BTreeMap<String, f64> {
		let mut totals: BTreeMap<String, f64> = BTreeMap::new();
		for snap in self.iter() {
			for (sql_id, elapsed) in &snap.sql_elapsed {
				*totals.entry(sql_id.clone()).or_insert(0.0) += *elapsed;
			}
		}
		totals
	}

	/// SQL ids with the largest total elapsed time, largest first.
	/// Equal totals are ordered by SQL id.
	pub fn top_sql_ids(&self, limit: usize) -> Vec<String> {
		let mut totals: Vec<(String, f64)> = self.sql_totals().into_iter().collect();
		totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		totals.into_iter().take(limit).map(|(sql_id, _)| sql_id).collect()
	}

	/// Keeps the `limit` heaviest SQL ids and gives every snapshot a value for
	/// each of them, zero where the snapshot didn't report it.
	pub fn retain_top_sql(&mut self, limit: usize) {
		let top = self.top_sql_ids(limit);
		for snap in self.snapshots.values_mut() {
			let kept = top
				.iter()
				.map(|sql_id| (sql_id.clone(), snap.sql_elapsed.get(sql_id).copied().unwrap_or(0.0)))
				.collect();
			snap.sql_elapsed = kept;
		}
	}

	pub fn to_json(&self) -> Result<String, AwrError> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
	/// First unreadable report stops the run.
	#[default]
	Abort,
	/// Unreadable reports are recorded and skipped.
	KeepGoing,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
	/// Only files whose name contains this text are read.
	pub filter: String,
	pub policy: FailurePolicy,
	pub quiet: bool,
}

#[derive(Debug)]
pub struct FileFailure {
	pub file: String,
	pub error: AwrError,
}

#[derive(Debug, Default)]
pub struct DirParse {
	pub collection: AwrCollection,
	pub files_parsed: usize,
	pub warnings: Vec<String>,
	pub failures: Vec<FileFailure>,
}

/// `.txt` files in `dir` whose name contains `filter`, sorted by name.
pub fn report_files(dir: &Path, filter: &str) -> Result<Vec<PathBuf>, AwrError> {
	let io_err = |source| AwrError::Io { path: dir.to_path_buf(), source };
	let mut files = Vec::new();
	for entry in fs::read_dir(dir).map_err(io_err)? {
		let path = entry.map_err(io_err)?.path();
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		if name.ends_with(".txt") && name.contains(filter) && path.is_file() {
			files.push(path);
		}
	}
	files.sort();
	Ok(files)
}

/// Reads and scans a single report file.
pub fn parse_awr_report(path: &Path) -> Result<ParsedReport, AwrError> {
	let bytes = fs::read(path).map_err(|source| AwrError::Io { path: path.to_path_buf(), source })?;
	let text = String::from_utf8_lossy(&bytes);
	let fname = path
		.file_name()
		.map(|n| n.to_string_lossy().to_string())
		.unwrap_or_else(|| path.display().to_string());
	awr_txt::parse_awr_text(&fname, &text)
}

/// Scans every matching report in `dir` and merges the snapshots. Top SQL is
/// pruned once all files were read.
pub fn parse_awr_dir(dir: &Path, opts: &ParseOptions) -> Result<DirParse, AwrError> {
	if !opts.quiet {
		println!("{}", "\n==== PARSING DIRECTORY DATA ===".bright_cyan());
	}
	let mut result = DirParse::default();

	for path in report_files(dir, &opts.filter)? {
		let fname = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
		let report = match parse_awr_report(&path) {
			Ok(report) => report,
			Err(e) if opts.policy == FailurePolicy::KeepGoing => {
				crate::debug_note!("skipping {}: {}", fname, e);
				result.failures.push(FileFailure { file: fname, error: e });
				continue;
			}
			Err(e) => return Err(e),
		};
		crate::debug_note!("{}: release {} ({:?}), {} snapshot(s)", fname, report.version, report.layout, report.snapshots.len());

		result.warnings.extend(report.warnings);
		for snapshot in report.snapshots {
			let key = snapshot.key.clone();
			if let Some(old) = result.collection.insert(snapshot) {
				result.warnings.push(format!("snapshot {} from {} replaces the one read from {}", key, fname, old.source));
			}
		}
		result.files_parsed += 1;
		if !opts.quiet {
			print!("\rNumber of reports parsed: {}", result.files_parsed);
			let _ = io::stdout().flush();
		}
	}
	if !opts.quiet {
		println!();
	}

	result.collection.retain_top_sql(crate::staticdata::TOP_SQL_LIMIT);
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn snap(ts: &str, id: &str, sql: &[(&str, f64)]) -> Snapshot {
		let mut s = Snapshot::new(SnapKey::new(ts, id), "test.txt");
		for (sql_id, elapsed) in sql {
			s.sql_elapsed.insert(sql_id.to_string(), *elapsed);
		}
		s
	}

	#[test]
	fn snap_key_orders_by_time_and_prints_id() {
		let a = SnapKey::new("20261018:10:00", "200");
		let b = SnapKey::new("20261018:11:00", "100");
		assert!(a < b);
		assert_eq!(a.to_string(), "20261018:10:00 (200)");
	}

	#[test]
	fn new_snapshot_has_zeroed_counters() {
		let s = Snapshot::new(SnapKey::new("20261018:10:00", "1"), "a.txt");
		assert_eq!(s.time_model.len(), TimeModelStat::ALL.len());
		assert_eq!(s.instance_stats.len(), InstanceStat::ALL.len());
		assert!(s.time_model.values().all(|v| *v == 0.0));
		assert!(s.instance_stats.values().all(|v| *v == 0.0));
	}

	#[test]
	fn top_sql_keeps_twenty_heaviest_and_zero_fills() {
		// 25 ids, sql_01 lightest .. sql_25 heaviest, split over two snapshots
		let first: Vec<(String, f64)> = (1..=13).map(|i| (format!("sql_{:02}", i), i as f64)).collect();
		let second: Vec<(String, f64)> = (14..=25).map(|i| (format!("sql_{:02}", i), i as f64)).collect();
		let first: Vec<(&str, f64)> = first.iter().map(|(k, v)| (k.as_str(), *v)).collect();
		let second: Vec<(&str, f64)> = second.iter().map(|(k, v)| (k.as_str(), *v)).collect();

		let mut c = AwrCollection::default();
		c.insert(snap("20261018:10:00", "1", &first));
		c.insert(snap("20261018:11:00", "2", &second));
		c.retain_top_sql(20);

		for s in c.iter() {
			assert_eq!(s.sql_elapsed.len(), 20);
			for dropped in 1..=5 {
				assert!(!s.sql_elapsed.contains_key(&format!("sql_{:02}", dropped)));
			}
		}
		let first = &c.snapshots[&SnapKey::new("20261018:10:00", "1")];
		assert_eq!(first.sql_elapsed["sql_06"], 6.0);
		assert_eq!(first.sql_elapsed["sql_25"], 0.0);
	}

	#[test]
	fn top_sql_ties_are_broken_by_id() {
		let mut c = AwrCollection::default();
		c.insert(snap("20261018:10:00", "1", &[("bbb", 5.0), ("aaa", 5.0), ("ccc", 9.0)]));
		assert_eq!(c.top_sql_ids(2), vec!["ccc".to_string(), "aaa".to_string()]);
	}

	#[test]
	fn duplicate_snapshot_is_replaced_whole() {
		let mut c = AwrCollection::default();
		let mut older = snap("20261018:10:00", "1", &[("aaa", 1.0)]);
		older.user_io_avg_ms = Some(3.0);
		let newer = snap("20261018:10:00", "1", &[("bbb", 2.0)]);
		assert!(c.insert(older).is_none());
		let replaced = c.insert(newer).unwrap();
		assert_eq!(replaced.user_io_avg_ms, Some(3.0));
		let kept = c.iter().next().unwrap();
		assert_eq!(kept.user_io_avg_ms, None);
		assert!(kept.sql_elapsed.contains_key("bbb"));
		assert!(!kept.sql_elapsed.contains_key("aaa"));
	}

	#[test]
	fn collection_json_uses_readable_keys() {
		let mut c = AwrCollection::default();
		c.insert(snap("20261018:10:00", "1", &[]));
		let json = c.to_json().unwrap();
		assert!(json.contains("\"20261018:10:00 (1)\""));
		assert!(json.contains("\"sql execute elapsed time\""));
	}

	#[test]
	fn wait_class_totals_reset_keeps_db_time() {
		let mut w = WaitClassTotals::default();
		w.add(WaitClass::UserIo, 1.5);
		w.add(WaitClass::UserIo, 1.0);
		w.db_time = 10.0;
		assert_eq!(w.get(WaitClass::UserIo), 2.5);
		w.reset_classes();
		assert_eq!(w.get(WaitClass::UserIo), 0.0);
		assert_eq!(w.db_time, 10.0);
	}
}
