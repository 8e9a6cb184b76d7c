use std::fs;
use std::path::Path;

use awr_trend::analyze::{self, ChartOptions, ReportMode};
use awr_trend::awr::{parse_awr_dir, parse_awr_report, FailurePolicy, ParseOptions};
use awr_trend::error::AwrError;
use awr_trend::staticdata::{LoadMetric, WaitClass};
use awr_trend::ReportLayout;

fn quiet_opts(filter: &str, policy: FailurePolicy) -> ParseOptions {
	ParseOptions { filter: filter.to_string(), policy, quiet: true }
}

fn sql_row(elapsed: f64, sql_id: &str) -> String {
	format!("{:>16.1} {:>14} {:>13} {:>6} {:>6} {:>6} {}\n", elapsed, 10, "1.00", "5.0", "50.0", "40.0", sql_id)
}

/// A 19c report with one snapshot, its wait classes and the elapsed time top SQL table.
fn modern_report(snap_id: u32, begin: &str, db_minutes: f64, user_io: f64, sqls: &[(&str, f64)]) -> String {
	let mut text = format!(
		"\
WORKLOAD REPOSITORY report for

DB Name         DB Id    Unique Name DB Role          Edition Release    RAC CDB
------------ ----------- ----------- ---------------- ------- ---------- --- ---
PROD          1234567890 prod        PRIMARY          EE      19.0.0.0.0 NO  NO

              Snap Id      Snap Time      Sessions Curs/Sess  PDBs
            --------- ------------------- -------- --------- -----
Begin Snap:       {snap_id} {begin}        52       1.8     1
  End Snap:       {end_id} 18-Oct-26 23:59:59        55       1.9     1
   Elapsed:               60.00 (mins)
   DB Time:              {db_minutes:.2} (mins)

Wait Classes by Total Wait Time
Wait Class                  Waits       Time (sec)     (ms)   time Sessions
---------------- ---------------- ---------------- -------- ------ --------
DB CPU                                         726             96.8      2.4
User I/O                   12,345         {user_io:>8.1}   1.50ms   31.2      0.8
Commit                        120                3    25.00    0.4      0.0

Host CPU
~~~~~~~~                  Load Average
 CPUs Cores Sockets     Begin       End     %User   %System      %WIO     %Idle
----- ----- ------- --------- --------- --------- --------- --------- ---------
   16     8       2      1.23      2.34      12.3       4.5       0.9      82.3

SQL ordered by Elapsed Time       DB/Inst: PROD/prod  Snaps: {snap_id}-{end_id}
        Elapsed                  Elapsed Time
        Time (s)    Executions  per Exec (s)  %Total   %CPU    %IO    SQL Id
---------------- -------------- ------------- ------ ------ ------ -------------
",
		end_id = snap_id + 1,
	);
	for (sql_id, elapsed) in sqls {
		text.push_str(&sql_row(*elapsed, sql_id));
	}
	text.push_str("\nSQL ordered by CPU Time           DB/Inst: PROD/prod\n");
	text.push_str(&sql_row(999.0, "cpucpucpucpu1"));
	text
}

fn event_row(name: &str, waits: u64, total: f64) -> String {
	let name = &name[..name.len().min(26)];
	format!("{:<26} {:>12} {:>5} {:>12.1} {:>7} {:>8}\n", name, waits, 0, total, "1.0", "0.5")
}

/// An 11.2.0.3 report: block labels without units, foreground events instead of
/// wait classes and a Host CPU table that leaves the core count in its header.
fn legacy_report() -> String {
	let mut text = String::from(
		"\
WORKLOAD REPOSITORY report for

DB Name         DB Id    Instance     Inst Num Startup Time    Release     RAC
------------ ----------- ------------ -------- --------------- ----------- ---
LEGACY         987654321 legacy              1 01-Oct-26 08:00 11.2.0.3.0  NO

              Snap Id      Snap Time      Sessions Curs/Sess
            --------- ------------------- -------- ---------
Begin Snap:       500 17-Oct-26 22:00:00        40       2.0
  End Snap:       501 17-Oct-26 23:00:00        42       2.1
   Elapsed:               60.00 (mins)
   DB Time:               10.00 (mins)

Load Profile              Per Second    Per Transaction   Per Exec   Per Call
~~~~~~~~~~~~         ---------------    --------------- ---------- ----------
      DB Time(s):                0.2                0.0       0.00       0.00
       Redo size:        2,097,152.0            1,234.5
   Logical reads:            5,432.1               12.3
  Physical reads:              123.4                0.3

Foreground Wait Events       DB/Inst: LEGACY/legacy  Snaps: 500-501
-> s  - second, ms - millisecond -    1000th of a second
                                                             Avg
                                        %Time Total Wait    wait    Waits
Event                             Waits -outs   Time (s)    (ms)     /txn
-------------------------- ------------ ----- ---------- ------- --------
",
	);
	text.push_str(&event_row("db file sequential read", 40_000, 120.0));
	text.push_str(&event_row("db file scattered read", 3_000, 37.0));
	text.push_str(&event_row("log file sync", 9_000, 45.0));
	text.push_str(&event_row("enq: TX - row lock contention", 12, 12.0));
	text.push_str(&event_row("SQL*Net message to client", 80_000, 1.0));
	text.push_str(&event_row("latch free", 300, 8.0));
	text.push_str(&event_row("SQL*Net message from client", 80_000, 5_000.0));
	text.push_str(
		"\

Background Wait Events       DB/Inst: LEGACY/legacy  Snaps: 500-501
log file parallel write           9,000     0         30      3.3      1.0

Host CPU (CPUs:    4 Cores:    2 Sockets:    1)
~~~~~~~~         Load Average
               Begin       End     %User   %System      %WIO     %Idle
           --------- --------- --------- --------- --------- ---------
                0.52      0.61       8.3       2.1       0.4      89.6
",
	);
	text
}

fn write(dir: &Path, name: &str, text: &str) {
	fs::write(dir.join(name), text).unwrap();
}

#[test]
fn matching_reports_are_merged_in_snapshot_order() {
	let dir = tempfile::tempdir().unwrap();
	write(
		dir.path(),
		"awr_prod_2.txt",
		&modern_report(101, "18-Oct-26 11:00:01", 30.0, 400.0, &[("aaaaaaaaaaaaa", 10.0), ("ccccccccccccc", 70.0)]),
	);
	write(
		dir.path(),
		"awr_prod_1.txt",
		&modern_report(100, "18-Oct-26 10:00:01", 120.0, 1234.0, &[("aaaaaaaaaaaaa", 100.0), ("bbbbbbbbbbbbb", 50.0)]),
	);
	// neither matches: wrong name, wrong extension
	write(dir.path(), "awr_test_1.txt", "garbage that would not parse\n");
	write(dir.path(), "awr_prod_notes.md", "garbage that would not parse\n");

	let parsed = parse_awr_dir(dir.path(), &quiet_opts("prod", FailurePolicy::Abort)).unwrap();
	assert_eq!(parsed.files_parsed, 2);
	assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
	assert!(parsed.failures.is_empty());

	let keys: Vec<String> = parsed.collection.iter().map(|s| s.key.to_string()).collect();
	assert_eq!(keys, vec!["20261018:10:00 (100)", "20261018:11:00 (101)"]);

	let snaps: Vec<_> = parsed.collection.iter().collect();
	assert_eq!(snaps[0].wait_classes.db_time, 7200.0);
	assert_eq!(snaps[1].wait_classes.db_time, 1800.0);
	assert_eq!(snaps[0].wait_classes.get(WaitClass::UserIo), 1234.0);
	assert_eq!(snaps[0].wait_classes.get(WaitClass::Commit), 3.0);
	assert_eq!(snaps[0].user_io_avg_ms, Some(1.5));
	assert_eq!(snaps[0].source, "awr_prod_1.txt");
	assert_eq!(snaps[0].host_cpu.as_ref().and_then(|c| c.cores), Some(8));

	// every snapshot carries every kept SQL id, zero where it wasn't reported
	assert_eq!(parsed.collection.top_sql_ids(20), vec!["aaaaaaaaaaaaa", "ccccccccccccc", "bbbbbbbbbbbbb"]);
	assert_eq!(snaps[1].sql_elapsed.len(), 3);
	assert_eq!(snaps[1].sql_elapsed["bbbbbbbbbbbbb"], 0.0);
	assert_eq!(snaps[0].sql_elapsed["ccccccccccccc"], 0.0);
	assert!(!snaps[0].sql_elapsed.contains_key("cpucpucpucpu1"));
}

#[test]
fn per_instance_reports_keep_their_load_profile_db_time() {
	let profile = "
Load Profile                    Per Second   Per Transaction
~~~~~~~~~~~~~~~            ---------------   ---------------
             DB Time(s):              45.2               0.5
";
	let dir = tempfile::tempdir().unwrap();
	let first = modern_report(100, "18-Oct-26 10:00:01", 60.0, 1.0, &[("aaaaaaaaaaaaa", 3.0)]) + profile;
	let second = modern_report(101, "18-Oct-26 10:05:01", 60.0, 1.0, &[("bbbbbbbbbbbbb", 4.0)]) + profile;
	write(dir.path(), "awr_inst1_snap101.txt", &second);
	write(dir.path(), "awr_inst1_snap100.txt", &first);
	write(dir.path(), "awr_inst2_snap100.txt", &first);

	let parsed = parse_awr_dir(dir.path(), &quiet_opts("inst1", FailurePolicy::Abort)).unwrap();
	let keys: Vec<String> = parsed.collection.iter().map(|s| s.key.to_string()).collect();
	assert_eq!(keys, vec!["20261018:10:00 (100)", "20261018:10:05 (101)"]);
	for snap in parsed.collection.iter() {
		assert_eq!(snap.load_profile.get(LoadMetric::DbTime), Some(45.2));
	}
	let snaps: Vec<_> = parsed.collection.iter().collect();
	assert_eq!(snaps[0].sql_elapsed["aaaaaaaaaaaaa"], 3.0);
	assert_eq!(snaps[1].sql_elapsed["bbbbbbbbbbbbb"], 4.0);
	assert!(parsed.warnings.is_empty());
}

#[test]
fn later_file_replaces_duplicate_snapshot() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "prod_a.txt", &modern_report(100, "18-Oct-26 10:00:01", 120.0, 1.0, &[]));
	write(dir.path(), "prod_b.txt", &modern_report(100, "18-Oct-26 10:00:01", 60.0, 2.0, &[]));

	let parsed = parse_awr_dir(dir.path(), &quiet_opts("prod", FailurePolicy::Abort)).unwrap();
	assert_eq!(parsed.collection.len(), 1);
	let snap = parsed.collection.iter().next().unwrap();
	assert_eq!(snap.source, "prod_b.txt");
	assert_eq!(snap.wait_classes.db_time, 3600.0);
	assert_eq!(parsed.warnings.len(), 1);
	assert!(parsed.warnings[0].contains("prod_a.txt"));
}

#[test]
fn legacy_report_sums_foreground_events() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("sp_legacy.txt");
	fs::write(&path, legacy_report()).unwrap();

	let report = parse_awr_report(&path).unwrap();
	assert_eq!(report.version, "11.2.0.3.0");
	assert_eq!(report.layout, ReportLayout::Legacy);
	assert_eq!(report.snapshots.len(), 1);

	let snap = &report.snapshots[0];
	assert_eq!(snap.key.to_string(), "20261017:22:00 (500)");
	assert_eq!(snap.wait_classes.db_time, 600.0);

	let w = &snap.wait_classes;
	assert_eq!(w.get(WaitClass::UserIo), 157.0);
	assert_eq!(w.get(WaitClass::Commit), 45.0);
	assert_eq!(w.get(WaitClass::Application), 12.0);
	assert_eq!(w.get(WaitClass::Network), 1.0);
	// "latch free" is Other, which isn't summed; background events are outside the section
	assert_eq!(w.get(WaitClass::Other), 0.0);
	assert_eq!(w.get(WaitClass::SystemIo), 0.0);

	let lp = &snap.load_profile;
	assert_eq!(lp.get(LoadMetric::DbTime), Some(0.2));
	assert_eq!(lp.get(LoadMetric::RedoSize), Some(2.0));
	assert_eq!(lp.get(LoadMetric::LogicalReads), Some(5432.1));
	assert_eq!(lp.get(LoadMetric::PhysicalReads), Some(123.4));
	assert_eq!(lp.get(LoadMetric::BeginSessions), Some(40.0));

	let cpu = snap.host_cpu.as_ref().unwrap();
	assert_eq!(cpu.cores, Some(2));
	assert_eq!(cpu.load_avg_end, Some(0.61));
	assert_eq!(cpu.pct_idle, Some(89.6));
}

#[test]
fn abort_policy_stops_at_first_bad_report() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "prod_1.txt", &modern_report(100, "18-Oct-26 10:00:01", 120.0, 1.0, &[]));
	write(dir.path(), "prod_2.txt", "this report has no release line\n");

	let err = parse_awr_dir(dir.path(), &quiet_opts("prod", FailurePolicy::Abort)).unwrap_err();
	assert!(matches!(err, AwrError::VersionNotFound { .. }));
	assert_eq!(err.file(), Some("prod_2.txt"));
}

#[test]
fn keep_going_policy_records_failures() {
	let dir = tempfile::tempdir().unwrap();
	write(dir.path(), "prod_1.txt", &modern_report(100, "18-Oct-26 10:00:01", 120.0, 1.0, &[]));
	write(dir.path(), "prod_2.txt", "this report has no release line\n");

	let parsed = parse_awr_dir(dir.path(), &quiet_opts("prod", FailurePolicy::KeepGoing)).unwrap();
	assert_eq!(parsed.files_parsed, 1);
	assert_eq!(parsed.collection.len(), 1);
	assert_eq!(parsed.failures.len(), 1);
	assert_eq!(parsed.failures[0].file, "prod_2.txt");
}

#[test]
fn missing_directory_is_an_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("nope");
	let err = parse_awr_dir(&missing, &quiet_opts("", FailurePolicy::Abort)).unwrap_err();
	assert!(matches!(err, AwrError::Io { .. }));
}

#[test]
fn chart_and_json_are_written() {
	let dir = tempfile::tempdir().unwrap();
	write(
		dir.path(),
		"awr_prod_1.txt",
		&modern_report(100, "18-Oct-26 10:00:01", 120.0, 1234.0, &[("aaaaaaaaaaaaa", 100.0)]),
	);
	write(
		dir.path(),
		"awr_prod_2.txt",
		&modern_report(101, "18-Oct-26 11:00:01", 30.0, 400.0, &[("aaaaaaaaaaaaa", 10.0)]),
	);
	let parsed = parse_awr_dir(dir.path(), &quiet_opts("prod", FailurePolicy::Abort)).unwrap();

	let out = dir.path().join("prod.html");
	analyze::plot_to_file(&parsed.collection, &out, ChartOptions::default(), "prod").unwrap();
	let html = fs::read_to_string(&out).unwrap();
	assert!(html.contains("<title>prod</title>"));
	assert!(html.contains("Wait Class Time"));
	assert!(html.contains("aaaaaaaaaaaaa"));
	assert!(html.contains("Correlation with DB Time"));

	let sql_only = ChartOptions { mode: ReportMode::SqlOnly, scale: false };
	let html = analyze::render_html(&parsed.collection, sql_only, "prod");
	assert!(!html.contains("Host CPU"));
	assert!(html.contains("Top 1 SQL by elapsed time"));

	let json: serde_json::Value = serde_json::from_str(&parsed.collection.to_json().unwrap()).unwrap();
	let snapshots = json["snapshots"].as_object().unwrap();
	assert_eq!(snapshots.len(), 2);
	assert!(snapshots.contains_key("20261018:10:00 (100)"));
}

#[test]
fn chart_into_missing_directory_is_an_output_error() {
	let dir = tempfile::tempdir().unwrap();
	let parsed = parse_awr_dir(dir.path(), &quiet_opts("prod", FailurePolicy::Abort)).unwrap();
	assert!(parsed.collection.is_empty());
	let out = dir.path().join("missing").join("prod.html");
	let err = analyze::plot_to_file(&parsed.collection, &out, ChartOptions::default(), "prod").unwrap_err();
	assert!(matches!(err, AwrError::Output { .. }));
}
