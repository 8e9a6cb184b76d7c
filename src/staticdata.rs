// Fixed vocabularies used by the text report scanner:
// - the ten plotted wait classes and the wait event -> class table
// - load profile metrics grouped by unit family
// - time model and instance activity counters that are always reported
//
// The event table is only consulted for legacy (pre 11.2.0.4) reports, where
// wait class totals have to be summed from individual foreground events.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Reports from this release on carry the "Wait Classes by Total Wait Time" table.
pub const MODERN_LAYOUT_MIN: [u32; 5] = [11, 2, 0, 4, 0];

/// Number of SQL ids kept after all reports were scanned.
pub const TOP_SQL_LIMIT: usize = 20;

pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Legacy wait event rows truncate the event name to this many columns.
pub const LEGACY_EVENT_NAME_WIDTH: usize = 26;

/// Width of an Oracle SQL_ID as printed in the "SQL ordered by" tables.
pub const SQL_ID_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WaitClass {
    #[serde(rename = "System I/O")]
    SystemIo,
    #[serde(rename = "User I/O")]
    UserIo,
    Cluster,
    Concurrency,
    Administrative,
    Application,
    Network,
    Commit,
    Configuration,
    Other,
}

impl WaitClass {
    pub const ALL: [WaitClass; 10] = [
        WaitClass::SystemIo,
        WaitClass::UserIo,
        WaitClass::Cluster,
        WaitClass::Concurrency,
        WaitClass::Administrative,
        WaitClass::Application,
        WaitClass::Network,
        WaitClass::Commit,
        WaitClass::Configuration,
        WaitClass::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WaitClass::SystemIo => "System I/O",
            WaitClass::UserIo => "User I/O",
            WaitClass::Cluster => "Cluster",
            WaitClass::Concurrency => "Concurrency",
            WaitClass::Administrative => "Administrative",
            WaitClass::Application => "Application",
            WaitClass::Network => "Network",
            WaitClass::Commit => "Commit",
            WaitClass::Configuration => "Configuration",
            WaitClass::Other => "Other",
        }
    }

    /// Exact match against the class names printed in the wait class table.
    pub fn from_label(label: &str) -> Option<WaitClass> {
        WaitClass::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for WaitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Class of a single wait event. Idle, Scheduler and Queueing are never plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    Plotted(WaitClass),
    Idle,
    Scheduler,
    Queueing,
}

impl EventClass {
    /// Class that a legacy wait event row contributes to. `Other` is reported
    /// on its own in legacy reports, so its events are left out of the sums.
    pub fn summed_class(self) -> Option<WaitClass> {
        match self {
            EventClass::Plotted(WaitClass::Other) => None,
            EventClass::Plotted(class) => Some(class),
            EventClass::Idle | EventClass::Scheduler | EventClass::Queueing => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Load profile
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UnitFamily {
    /// seconds per second
    Time,
    /// megabytes per second
    Megabytes,
    /// blocks per second
    Blocks,
    /// plain counts per second
    Count,
}

impl UnitFamily {
    pub fn title(self) -> &'static str {
        match self {
            UnitFamily::Time => "Load Profile (s/s)",
            UnitFamily::Megabytes => "Load Profile (MB/s)",
            UnitFamily::Blocks => "Load Profile (blocks/s)",
            UnitFamily::Count => "Load Profile (per second)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadMetric {
    DbTime,
    DbCpu,
    BackgroundCpu,
    RedoSize,
    ReadIo,
    WriteIo,
    SqlWorkArea,
    LogicalReads,
    PhysicalReads,
    PhysicalWrites,
    BlockChanges,
    UserCalls,
    Parses,
    HardParses,
    Logons,
    Executes,
    Rollbacks,
    Transactions,
    ReadIoRequests,
    WriteIoRequests,
    BeginSessions,
    EndSessions,
}

impl LoadMetric {
    pub const ALL: [LoadMetric; 22] = [
        LoadMetric::DbTime,
        LoadMetric::DbCpu,
        LoadMetric::BackgroundCpu,
        LoadMetric::RedoSize,
        LoadMetric::ReadIo,
        LoadMetric::WriteIo,
        LoadMetric::SqlWorkArea,
        LoadMetric::LogicalReads,
        LoadMetric::PhysicalReads,
        LoadMetric::PhysicalWrites,
        LoadMetric::BlockChanges,
        LoadMetric::UserCalls,
        LoadMetric::Parses,
        LoadMetric::HardParses,
        LoadMetric::Logons,
        LoadMetric::Executes,
        LoadMetric::Rollbacks,
        LoadMetric::Transactions,
        LoadMetric::ReadIoRequests,
        LoadMetric::WriteIoRequests,
        LoadMetric::BeginSessions,
        LoadMetric::EndSessions,
    ];

    pub fn family(self) -> UnitFamily {
        use LoadMetric::*;
        match self {
            DbTime | DbCpu | BackgroundCpu => UnitFamily::Time,
            RedoSize | ReadIo | WriteIo | SqlWorkArea => UnitFamily::Megabytes,
            LogicalReads | PhysicalReads | PhysicalWrites | BlockChanges => UnitFamily::Blocks,
            UserCalls | Parses | HardParses | Logons | Executes | Rollbacks | Transactions
            | ReadIoRequests | WriteIoRequests | BeginSessions | EndSessions => UnitFamily::Count,
        }
    }

    pub fn label(self) -> &'static str {
        use LoadMetric::*;
        match self {
            DbTime => "DB Time",
            DbCpu => "DB CPU",
            BackgroundCpu => "Background CPU",
            RedoSize => "Redo size",
            ReadIo => "Read IO",
            WriteIo => "Write IO",
            SqlWorkArea => "SQL Work Area",
            LogicalReads => "Logical reads",
            PhysicalReads => "Physical reads",
            PhysicalWrites => "Physical writes",
            BlockChanges => "Block changes",
            UserCalls => "User calls",
            Parses => "Parses",
            HardParses => "Hard parses",
            Logons => "Logons",
            Executes => "Executes",
            Rollbacks => "Rollbacks",
            Transactions => "Transactions",
            ReadIoRequests => "Read IO requests",
            WriteIoRequests => "Write IO requests",
            BeginSessions => "Sessions (begin)",
            EndSessions => "Sessions (end)",
        }
    }
}

/// Load profile labels shared by every report release, after the trailing
/// unit in parentheses and the colon have been removed.
const LOAD_PROFILE_COMMON: [(&str, LoadMetric); 19] = [
    ("DB Time", LoadMetric::DbTime),
    ("DB time", LoadMetric::DbTime),
    ("DB CPU", LoadMetric::DbCpu),
    ("Background CPU", LoadMetric::BackgroundCpu),
    ("Redo size", LoadMetric::RedoSize),
    ("Read IO", LoadMetric::ReadIo),
    ("Write IO", LoadMetric::WriteIo),
    ("SQL Work Area", LoadMetric::SqlWorkArea),
    ("W/A MB processed", LoadMetric::SqlWorkArea),
    ("Block changes", LoadMetric::BlockChanges),
    ("User calls", LoadMetric::UserCalls),
    ("Parses", LoadMetric::Parses),
    ("Hard parses", LoadMetric::HardParses),
    ("Logons", LoadMetric::Logons),
    ("Executes", LoadMetric::Executes),
    ("Rollbacks", LoadMetric::Rollbacks),
    ("Transactions", LoadMetric::Transactions),
    ("Read IO requests", LoadMetric::ReadIoRequests),
    ("Write IO requests", LoadMetric::WriteIoRequests),
];

/// Block metrics as printed before 11.2.0.4: "Logical reads:", "Physical reads:" ...
pub const LEGACY_BLOCK_LABELS: [(&str, LoadMetric); 3] = [
    ("Logical reads", LoadMetric::LogicalReads),
    ("Physical reads", LoadMetric::PhysicalReads),
    ("Physical writes", LoadMetric::PhysicalWrites),
];

/// Block metrics as printed from 11.2.0.4: "Logical read (blocks):" ...
pub const MODERN_BLOCK_LABELS: [(&str, LoadMetric); 3] = [
    ("Logical read", LoadMetric::LogicalReads),
    ("Physical read", LoadMetric::PhysicalReads),
    ("Physical write", LoadMetric::PhysicalWrites),
];

pub fn load_metric_for_label(label: &str, block_labels: &[(&'static str, LoadMetric)]) -> Option<LoadMetric> {
    LOAD_PROFILE_COMMON
        .iter()
        .chain(block_labels.iter())
        .find(|(name, _)| *name == label)
        .map(|(_, metric)| *metric)
}

// ─────────────────────────────────────────────────────────────────────────────
// Time model & instance activity counters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TimeModelStat {
    #[serde(rename = "sql execute elapsed time")]
    SqlExecute,
    #[serde(rename = "DB CPU")]
    DbCpu,
    #[serde(rename = "parse time elapsed")]
    ParseTime,
    #[serde(rename = "hard parse elapsed time")]
    HardParse,
    #[serde(rename = "PL/SQL execution elapsed time")]
    PlsqlExecution,
    #[serde(rename = "PL/SQL compilation elapsed time")]
    PlsqlCompilation,
    #[serde(rename = "connection management call elapsed time")]
    ConnectionManagement,
    #[serde(rename = "hard parse (sharing criteria) elapsed time")]
    HardParseSharing,
    #[serde(rename = "hard parse (bind mismatch) elapsed time")]
    HardParseBindMismatch,
    #[serde(rename = "failed parse elapsed time")]
    FailedParse,
    #[serde(rename = "sequence load elapsed time")]
    SequenceLoad,
    #[serde(rename = "repeated bind elapsed time")]
    RepeatedBind,
}

impl TimeModelStat {
    pub const ALL: [TimeModelStat; 12] = [
        TimeModelStat::SqlExecute,
        TimeModelStat::DbCpu,
        TimeModelStat::ParseTime,
        TimeModelStat::HardParse,
        TimeModelStat::PlsqlExecution,
        TimeModelStat::PlsqlCompilation,
        TimeModelStat::ConnectionManagement,
        TimeModelStat::HardParseSharing,
        TimeModelStat::HardParseBindMismatch,
        TimeModelStat::FailedParse,
        TimeModelStat::SequenceLoad,
        TimeModelStat::RepeatedBind,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeModelStat::SqlExecute => "sql execute elapsed time",
            TimeModelStat::DbCpu => "DB CPU",
            TimeModelStat::ParseTime => "parse time elapsed",
            TimeModelStat::HardParse => "hard parse elapsed time",
            TimeModelStat::PlsqlExecution => "PL/SQL execution elapsed time",
            TimeModelStat::PlsqlCompilation => "PL/SQL compilation elapsed time",
            TimeModelStat::ConnectionManagement => "connection management call elapsed time",
            TimeModelStat::HardParseSharing => "hard parse (sharing criteria) elapsed time",
            TimeModelStat::HardParseBindMismatch => "hard parse (bind mismatch) elapsed time",
            TimeModelStat::FailedParse => "failed parse elapsed time",
            TimeModelStat::SequenceLoad => "sequence load elapsed time",
            TimeModelStat::RepeatedBind => "repeated bind elapsed time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum InstanceStat {
    #[serde(rename = "table scans (long tables)")]
    TableScansLong,
    #[serde(rename = "table scans (short tables)")]
    TableScansShort,
    #[serde(rename = "index fast full scans (full)")]
    IndexFastFullScans,
    #[serde(rename = "index scans kdiixs1")]
    IndexScans,
    #[serde(rename = "sorts (disk)")]
    SortsDisk,
    #[serde(rename = "sorts (memory)")]
    SortsMemory,
    #[serde(rename = "user commits")]
    UserCommits,
    #[serde(rename = "user rollbacks")]
    UserRollbacks,
    #[serde(rename = "parse count (hard)")]
    ParseCountHard,
    #[serde(rename = "execute count")]
    ExecuteCount,
    #[serde(rename = "redo log space requests")]
    RedoLogSpaceRequests,
    #[serde(rename = "physical reads direct")]
    PhysicalReadsDirect,
}

impl InstanceStat {
    pub const ALL: [InstanceStat; 12] = [
        InstanceStat::TableScansLong,
        InstanceStat::TableScansShort,
        InstanceStat::IndexFastFullScans,
        InstanceStat::IndexScans,
        InstanceStat::SortsDisk,
        InstanceStat::SortsMemory,
        InstanceStat::UserCommits,
        InstanceStat::UserRollbacks,
        InstanceStat::ParseCountHard,
        InstanceStat::ExecuteCount,
        InstanceStat::RedoLogSpaceRequests,
        InstanceStat::PhysicalReadsDirect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InstanceStat::TableScansLong => "table scans (long tables)",
            InstanceStat::TableScansShort => "table scans (short tables)",
            InstanceStat::IndexFastFullScans => "index fast full scans (full)",
            InstanceStat::IndexScans => "index scans kdiixs1",
            InstanceStat::SortsDisk => "sorts (disk)",
            InstanceStat::SortsMemory => "sorts (memory)",
            InstanceStat::UserCommits => "user commits",
            InstanceStat::UserRollbacks => "user rollbacks",
            InstanceStat::ParseCountHard => "parse count (hard)",
            InstanceStat::ExecuteCount => "execute count",
            InstanceStat::RedoLogSpaceRequests => "redo log space requests",
            InstanceStat::PhysicalReadsDirect => "physical reads direct",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wait event -> class
// ─────────────────────────────────────────────────────────────────────────────

static EVENT_CLASSES: Lazy<BTreeMap<&'static str, EventClass>> = Lazy::new(|| {
    let mut table = BTreeMap::new();
    for event in IDLE {
        table.insert(event, EventClass::Idle);
    }
    for (events, class) in [
        (&USER_IO[..], EventClass::Plotted(WaitClass::UserIo)),
        (&SYSTEM_IO[..], EventClass::Plotted(WaitClass::SystemIo)),
        (&CONCURRENCY[..], EventClass::Plotted(WaitClass::Concurrency)),
        (&APPLICATION[..], EventClass::Plotted(WaitClass::Application)),
        (&NETWORK[..], EventClass::Plotted(WaitClass::Network)),
        (&COMMIT[..], EventClass::Plotted(WaitClass::Commit)),
        (&CONFIGURATION[..], EventClass::Plotted(WaitClass::Configuration)),
        (&ADMINISTRATIVE[..], EventClass::Plotted(WaitClass::Administrative)),
        (&CLUSTER[..], EventClass::Plotted(WaitClass::Cluster)),
        (&OTHER[..], EventClass::Plotted(WaitClass::Other)),
        (&SCHEDULER[..], EventClass::Scheduler),
        (&QUEUEING[..], EventClass::Queueing),
    ] {
        for event in events {
            table.insert(*event, class);
        }
    }
    table
});

/// Resolves a (possibly truncated) event name from a legacy wait event row.
///
/// An exact name wins; otherwise the alphabetically first event that starts
/// with `event_name` is used. `None` means the event is unknown.
pub fn event_class(event_name: &str) -> Option<EventClass> {
    let event_name = event_name.trim();
    if event_name.is_empty() {
        return None;
    }
    if let Some(class) = EVENT_CLASSES.get(event_name) {
        return Some(*class);
    }
    EVENT_CLASSES
        .range(event_name..)
        .next()
        .filter(|(name, _)| name.starts_with(event_name))
        .map(|(_, class)| *class)
}

#[cfg(test)]
fn event_table_len() -> usize {
    EVENT_CLASSES.len()
}

#[cfg(test)]
fn is_idle(event_name: &str) -> bool {
    matches!(event_class(event_name), Some(EventClass::Idle))
}

const USER_IO: [&str; 58] = [
    "db file sequential read",
    "db file scattered read",
    "db file parallel read",
    "db file single write",
    "db file checkpoint completion",
    "direct path read",
    "direct path read temp",
    "direct path write",
    "direct path write temp",
    "direct path sync",
    "read by other session",
    "local write wait",
    "buffer read retry",
    "BFILE read",
    "BFILE get length",
    "BFILE open",
    "BFILE closure",
    "BFILE internal seek",
    "BFILE check if exists",
    "BFILE check if open",
    "Datapump dump file I/O",
    "dbms_file_transfer I/O",
    "DG Broker configuration file I/O",
    "Data file init write",
    "Log file init write",
    "Disk file operations I/O",
    "Parameter File I/O",
    "flashback log file sync",
    "securefile direct-read completion",
    "securefile direct-write completion",
    "external table read",
    "external table write",
    "external table open",
    "external table misc IO",
    "utl_file I/O",
    "dbverify reads",
    "Archive Manager file transfer I/O",
    "Shared IO Pool Memory",
    "Shared IO Pool IO Completion",
    "cell single block physical read",
    "cell multiblock physical read",
    "cell list of blocks physical read",
    "cell smart table scan",
    "cell smart index scan",
    "cell physical read no I/O",
    "cell single block read request",
    "cell multiblock read request",
    "cell list of blocks read request",
    "cell smart file creation",
    "cell statistics gather",
    "cell external table smart scan",
    "db flash cache single block physical read",
    "db flash cache multiblock physical read",
    "db flash cache write",
    "db flash cache invalidate wait",
    "db flash cache dynamic disabling wait",
    "lob read",
    "lob write",
];

const SYSTEM_IO: [&str; 44] = [
    "db file parallel write",
    "db file async I/O submit",
    "log file parallel write",
    "log file sequential read",
    "log file single write",
    "control file sequential read",
    "control file parallel write",
    "control file single write",
    "Log archive I/O",
    "RMAN backup & recovery I/O",
    "RMAN Disk slave I/O",
    "RMAN Tape slave I/O",
    "io done",
    "ksfd: async disk IO",
    "kfk: async disk IO",
    "kst: async disk IO",
    "Network file transfer",
    "Standby redo I/O",
    "RFS sequential i/o",
    "RFS random i/o",
    "RFS write",
    "ARCH random i/o",
    "ARCH sequential i/o",
    "LGWR random i/o",
    "LGWR sequential i/o",
    "LNS ASYNC control file txn",
    "recovery read",
    "Archiver slave I/O",
    "DBWR slave I/O",
    "LGWR slave I/O",
    "flashback log file write",
    "flashback log file read",
    "flashback log file create",
    "cell smart incremental backup",
    "cell smart restore from backup",
    "cell manager writing",
    "cell manager opening cell",
    "cell manager closing cell",
    "cell manager discovering disks",
    "db file parallel write completion",
    "Data Guard: RFS disk I/O",
    "Redo Transport MISC",
    "Redo Transport Open",
    "Redo Transport Close",
];

const CONCURRENCY: [&str; 41] = [
    "library cache: mutex X",
    "library cache: mutex S",
    "library cache lock",
    "library cache pin",
    "library cache load lock",
    "library cache revalidation",
    "library cache shutdown",
    "cursor: pin S",
    "cursor: pin S wait on X",
    "cursor: pin X",
    "cursor: mutex S",
    "cursor: mutex X",
    "buffer busy waits",
    "row cache lock",
    "row cache mutex",
    "row cache read",
    "latch: shared pool",
    "latch: cache buffers chains",
    "latch: In memory undo latch",
    "latch: MQL Tracking Latch",
    "latch: Undo Hint Latch",
    "latch: row cache objects",
    "latch: library cache",
    "latch: library cache lock",
    "latch: library cache pin",
    "latch: Change Notification Hash table latch",
    "os thread startup",
    "pipe put",
    "enq: TX - index contention",
    "resmgr:internal state change",
    "resmgr:internal state cleanup",
    "resmgr:sessions to exit",
    "logout restrictor",
    "SecureFile mutex",
    "enq: WG - lock fso",
    "enq: WG - delete fso",
    "Inmemory populate: get loadscn",
    "Global transaction acquire instance locks",
    "kkdlgon",
    "kksfbc research",
    "kksfbc child completion",
];

const APPLICATION: [&str; 18] = [
    "enq: TX - row lock contention",
    "enq: TM - contention",
    "enq: RO - fast object reuse",
    "enq: KO - fast object checkpoint",
    "enq: UL - contention",
    "enq: PW - flush prewarm buffers",
    "enq: RC - Result Cache: Contention",
    "enq: RC - Result Cache: Invalidation",
    "SQL*Net break/reset to client",
    "SQL*Net break/reset to dblink",
    "Wait for Table Lock",
    "Streams capture: filter callback waiting for ruleset",
    "Streams: apply reader waiting for DDL to apply",
    "WCR: replay lock order",
    "WCR: Sync context busy",
    "enq: JI - contention",
    "enq: AU - audit index file",
    "OLAP DML Sleep",
];

const NETWORK: [&str; 36] = [
    "SQL*Net message to client",
    "SQL*Net more data to client",
    "SQL*Net more data from client",
    "SQL*Net message to dblink",
    "SQL*Net message from dblink",
    "SQL*Net more data to dblink",
    "SQL*Net more data from dblink",
    "SQL*Net vector data to client",
    "SQL*Net vector data from client",
    "SQL*Net vector data to dblink",
    "SQL*Net vector data from dblink",
    "TCP Socket (KGAS)",
    "dispatcher listen timer",
    "dedicated server timer",
    "ARCH wait on SENDREQ",
    "ARCH wait on ATTACH",
    "ARCH wait on DETACH",
    "LNS wait on ATTACH",
    "LNS wait on SENDREQ",
    "LNS wait on DETACH",
    "LNS wait on LGWR",
    "LGWR wait on ATTACH",
    "LGWR wait on SENDREQ",
    "LGWR wait on DETACH",
    "LGWR wait on LNS",
    "RFS dispatch",
    "RFS close",
    "RFS attach",
    "RFS detach",
    "RFS create",
    "RFS ping",
    "RFS register",
    "remote db operation",
    "remote db file read",
    "remote db file write",
    "TEXT: URL_DATASTORE network wait",
];

const COMMIT: [&str; 5] = [
    "log file sync",
    "remote log force - commit",
    "enq: BB - 2PC across RAC instances",
    "nologging standby txn commit",
    "IMR slave acknowledgement msg",
];

const CONFIGURATION: [&str; 25] = [
    "log file switch (checkpoint incomplete)",
    "log file switch (archiving needed)",
    "log file switch (private strand flush incomplete)",
    "log file switch completion",
    "log file switch (clearing log file)",
    "log buffer space",
    "free buffer waits",
    "write complete waits",
    "write complete waits: flash cache",
    "enq: HW - contention",
    "enq: SQ - contention",
    "enq: ST - contention",
    "enq: TX - allocate ITL entry",
    "enq: SS - contention",
    "undo segment extension",
    "undo segment tx slot",
    "statement suspended, wait error to be cleared",
    "latch: redo writing",
    "latch: redo copy",
    "checkpoint completed",
    "sort segment request",
    "wait for EMON to process ntfns",
    "Streams AQ: enqueue blocked on low memory",
    "enq: TX - allocate ITL entry for cluster",
    "Sync ASM rebalance",
];

const ADMINISTRATIVE: [&str; 49] = [
    "Backup: MML initialization",
    "Backup: MML v1 open backup piece",
    "Backup: MML v1 read backup piece",
    "Backup: MML v1 write backup piece",
    "Backup: MML v1 close backup piece",
    "Backup: MML v1 query backup piece",
    "Backup: MML v1 delete backup piece",
    "Backup: MML create a backup piece",
    "Backup: MML commit backup piece",
    "Backup: MML command to channel",
    "Backup: MML shutdown",
    "Backup: MML obtain textual error",
    "Backup: MML query backup piece",
    "Backup: MML extended initialization",
    "Backup: MML read backup piece",
    "Backup: MML delete backup piece",
    "Backup: MML restore backup piece",
    "Backup: MML write backup piece",
    "Backup: MML proxy initialize backup",
    "Backup: MML proxy cancel",
    "Backup: MML proxy commit backup piece",
    "Backup: MML proxy session end",
    "Backup: MML datafile proxy backup?",
    "Backup: MML datafile proxy restore?",
    "Backup: MML proxy prepare to start",
    "Backup: MML obtain a direct buffer",
    "Backup: MML release a direct buffer",
    "Backup: MML get base address",
    "Backup: MML query for direct buffers",
    "multiple dbwriter suspend/resume for file offline",
    "enq: DB - contention",
    "enq: ZG - contention",
    "enq: TW - contention",
    "enq: DW - contention",
    "switch logfile command",
    "alter system set dispatcher",
    "JS coord start wait",
    "JS kgl get object wait",
    "JS kill job wait",
    "connection pool wait",
    "index (re)build online start",
    "index (re)build online cleanup",
    "index (re)build online merge",
    "index (re)build lock or pin object",
    "wait for possible quiesce finish",
    "buffer pool resize",
    "ASM COD rollback operation completion",
    "ASM mount : wait for heartbeat",
    "switch undo - offline",
];

const CLUSTER: [&str; 62] = [
    "gc cr request",
    "gc current request",
    "gc cr block 2-way",
    "gc cr block 3-way",
    "gc current block 2-way",
    "gc current block 3-way",
    "gc cr block busy",
    "gc current block busy",
    "gc cr block congested",
    "gc current block congested",
    "gc cr block lost",
    "gc current block lost",
    "gc cr grant 2-way",
    "gc current grant 2-way",
    "gc cr grant busy",
    "gc current grant busy",
    "gc cr grant congested",
    "gc current grant congested",
    "gc cr multi block request",
    "gc cr multi block grant",
    "gc cr multi block mixed",
    "gc current multi block request",
    "gc buffer busy acquire",
    "gc buffer busy release",
    "gc buffer busy",
    "gc cr failure",
    "gc current retry",
    "gc current split",
    "gc remaster",
    "gc domain validation",
    "gc recovery quiesce",
    "gc claim",
    "gc cr disk read",
    "gc cr disk request",
    "gc cr cancel",
    "gc current cancel",
    "gc quiesce",
    "gc object scan",
    "gc policy change",
    "gc freelist",
    "gc index operation",
    "gc recovery",
    "gc recovery free",
    "gc transaction table",
    "gc transaction table 2-way",
    "gc transaction table 3-way",
    "gc current grant read-mostly invalidation",
    "gc cr block read-mostly",
    "gcs drm freeze in enter server mode",
    "gcs log flush sync",
    "gcs resource directory to be unfrozen",
    "gcs enter server mode",
    "gcs domain validation",
    "ges inquiry response",
    "ges message buffer allocation",
    "retry contact SCN lock master",
    "lock remastering",
    "pi renounce write complete",
    "kjbdrmcvtq lmon drm quiesce: ping completion",
    "KJC: Wait for msg sends to complete",
    "lms flush message acks",
    "cr request retry",
];

const OTHER: [&str; 180] = [
    "enq: TX - contention",
    "enq: US - contention",
    "enq: CF - contention",
    "enq: PS - contention",
    "enq: TO - contention",
    "enq: TT - contention",
    "enq: JQ - contention",
    "enq: PR - contention",
    "enq: CI - contention",
    "enq: TQ - TM contention",
    "enq: TQ - DDL contention",
    "enq: FB - contention",
    "enq: WF - contention",
    "enq: AE - lock",
    "enq: PV - syncstart",
    "enq: PE - contention",
    "enq: JS - queue lock",
    "enq: MR - contention",
    "enq: DL - contention",
    "enq: TS - contention",
    "enq: CR - block range reuse ckpt",
    "enq: TC - contention",
    "enq: TC - contention2",
    "enq: XR - database force logging",
    "enq: IV -  contention",
    "enq: AF - task serialization",
    "enq: DR - contention",
    "enq: FU - contention",
    "enq: MW - contention",
    "enq: OD - Serializing DDLs",
    "enq: SH - contention",
    "enq: SJ - Slave Task Cancel",
    "enq: IS - contention",
    "enq: TD - KTF dump entries",
    "enq: TE - KTF broadcast",
    "enq: TF - contention",
    "enq: TH - metric threshold evaluation",
    "enq: TK - Auto Task Serialization",
    "enq: WL - contention",
    "enq: WR - contention",
    "enq: XL - fault extent map",
    "enq: CT - global space management",
    "enq: CU - contention",
    "enq: DM - contention",
    "enq: FS - contention",
    "enq: KM - contention",
    "enq: MD - contention",
    "enq: PD - contention",
    "enq: PF - contention",
    "enq: PI - contention",
    "enq: RS - file delete",
    "enq: SE - contention",
    "enq: SW - contention",
    "enq: TB - SQL Tuning Base Cache Update",
    "enq: WM - WLM Plan activation",
    "enq: XH - contention",
    "enq: BF - allocation contention",
    "enq: RT - contention",
    "enq: RO - contention",
    "enq: KO - contention",
    "latch free",
    "latch: cache buffers lru chain",
    "latch: checkpoint queue latch",
    "latch: redo allocation",
    "latch: enqueue hash chains",
    "latch: object queue header operation",
    "latch: messages",
    "latch: parallel query alloc buffer",
    "latch: session allocation",
    "latch: undo global data",
    "latch: ges resource hash list",
    "latch: gcs resource hash",
    "latch: active service list",
    "latch: call allocation",
    "latch: cache buffer handles",
    "latch: dml lock allocation",
    "latch: enqueues",
    "latch: KCL gc element parent latch",
    "latch: list of block allocation",
    "latch: multiblock read objects",
    "latch: object queue header heap",
    "latch: post/wait queue",
    "latch: redo on-disk SCN",
    "latch: SQL memory manager latch",
    "latch: SQL memory manager workarea list latch",
    "latch: transaction allocation",
    "latch: virtual circuit queues",
    "latch: change notification client cache latch",
    "latch: Memory Queue",
    "latch: lob segment hash table latch",
    "latch: mostly latch-free SCN",
    "latch: ges process parent latch",
    "latch activity",
    "control file heartbeat",
    "wait list latch free",
    "wait for scn ack",
    "wait for a undo record",
    "wait for stopper event to be increased",
    "rdbms ipc reply",
    "process startup",
    "process shutdown",
    "PX Deq: Signal ACK RSG",
    "PX Deq: Signal ACK EXT",
    "PX Deq: Slave Session Stats",
    "PX Deq: Join ACK",
    "PX Deq: Slave Join Frag",
    "PX Deq: Test for msg",
    "PX Deq: reap credit",
    "PX Deq Credit: free buffer",
    "PX Deq: Table Q qref",
    "PX Deq: Table Q Get Keys",
    "PX Deq: Table Q Close",
    "PX Nsq: PQ load info query",
    "PX Nsq: PQ descriptor query",
    "PX qref latch",
    "PX server shutdown",
    "PX create server",
    "PX signal server",
    "reliable message",
    "buffer deadlock",
    "buffer exterminate",
    "buffer latch",
    "buffer resize",
    "DFS lock handle",
    "ksdxexeotherwait",
    "qerex_gdml",
    "LGWR any worker group",
    "LGWR all worker groups",
    "LGWR worker group ordering",
    "LGWR intra group sync",
    "LGWR intra group IO completion",
    "target log write size",
    "log file sync: SCN ordering",
    "lock escalate retry",
    "lock deadlock retry",
    "IPC send completion sync",
    "IPC wait for name service busy",
    "IPC busy async request",
    "IPC waiting for OSD resources",
    "ADR block file read",
    "ADR block file write",
    "ADR file lock",
    "asynch descriptor resize",
    "CGS wait for IPC msg",
    "CSS initialization",
    "CSS group registration",
    "CSS group membership query",
    "CSS operation: action",
    "CSS operation: query",
    "CSS operation: diagnostic",
    "CSS Xgrp shared operation",
    "ges generic event",
    "ges lms sync during dynamic remastering and reconfig",
    "ges LMD to shutdown",
    "ges reconfiguration to start",
    "ges user error",
    "ges global resource directory to be frozen",
    "ges resource directory to be unfrozen",
    "ges cgs registration",
    "ges lmd/lmses to freeze in rcfg",
    "ges lmd/lmses to unfreeze in rcfg",
    "ges wait for lmon to be ready",
    "events in waitclass Other",
    "name-service call wait",
    "os thread creation",
    "parallel recovery read buffer free",
    "parallel recovery change buffer free",
    "parallel recovery slave wait for change",
    "recovery buffer pinned",
    "secondary event",
    "slave exit",
    "SGA: allocation forcing component growth",
    "SGA: sga_target resize",
    "Space Manager: slave messages",
    "test long ops",
    "timer in sksawat",
    "transaction",
    "unbound tx",
    "undo_retention publish retry",
    "wait active processes",
];

const SCHEDULER: [&str; 9] = [
    "resmgr:become active",
    "resmgr:cpu quantum",
    "resmgr:pq queued",
    "resmgr:large I/O queued",
    "resmgr:small I/O queued",
    "resmgr:I/O prioritization",
    "resmgr:I/O rate limit",
    "resmgr:plan change",
    "resmgr:internal state change (cell)",
];

const QUEUEING: [&str; 4] = [
    "Streams capture: waiting for subscribers to catch up",
    "Streams AQ: enqueue blocked due to flow control",
    "Streams capture: resolve low memory condition",
    "Streams: flow control",
];

const IDLE: [&str; 172] = [
    "cached session",
    "VKTM Logical Idle Wait",
    "VKTM Init Wait for GSGA",
    "IORM Scheduler Slave Idle Wait",
    "rdbms ipc message",
    "i/o slave wait",
    "OFS Receive Queue",
    "OFS idle",
    "Generic Process Pool Dispatcher: idle",
    "Generic Process Pool Worker: sleep",
    "VKRM Idle",
    "wait for unread message on broadcast channel",
    "wait for unread message on multiple broadcast channels",
    "class slave wait",
    "idle class spare wait event 1",
    "idle class spare wait event 2",
    "idle class spare wait event 3",
    "idle class spare wait event 4",
    "idle class spare wait event 5",
    "idle class spare wait event 6",
    "idle class spare wait event 7",
    "idle class spare wait event 8",
    "idle class spare wait event 9",
    "idle class spare wait event 10",
    "RMA: IPC0 completion sync",
    "PING",
    "spawn request deferred",
    "watchdog main loop",
    "process in prespawned state",
    "pmon timer",
    "pman timer",
    "DNFS disp IO slave idle",
    "NVM disp IO slave idle",
    "BRDG: bridge controller idle",
    "Network Retrans by Server",
    "Network Retrans by Client",
    "Distributed Trace: Archival Worker Idle",
    "DIAG idle wait",
    "ges remote message",
    "SCM slave idle",
    "LMS CR slave timer",
    "gcs remote message",
    "gcs yield cpu",
    "heartbeat monitor sleep",
    "GCR sleep",
    "Shutdown completion due to error",
    "SGA: MMAN sleep for component shrink",
    "DBWR timer",
    "Data Guard: Gap Manager",
    "Data Guard: controlfile update",
    "MRP redo arrival",
    "Data Guard: Timer",
    "LNS ASYNC archive log",
    "LNS ASYNC dest activation",
    "LNS ASYNC end of log",
    "Archiver: redo logs",
    "simulated log write delay",
    "heartbeat redo informer",
    "LGWR real time apply sync",
    "LGWR worker group idle",
    "parallel recovery slave idle wait",
    "Backup Appliance waiting for work",
    "Backup Appliance waiting restore start",
    "Backup Appliance Surrogate wait",
    "Backup Appliance Servlet wait",
    "Backup Appliance Comm SGA setup wait",
    "LogMiner builder: idle",
    "LogMiner builder: branch",
    "LogMiner preparer: idle",
    "LogMiner reader: log (idle)",
    "LogMiner reader: redo (idle)",
    "LogMiner merger: idle",
    "LogMiner client: transaction",
    "LogMiner: other",
    "LogMiner: activate",
    "LogMiner: reset",
    "LogMiner: find session",
    "LogMiner: internal",
    "Logical Standby Apply Delay",
    "parallel recovery coordinator waits for slave cleanup",
    "parallel recovery coordinator idle wait",
    "parallel recovery control message reply",
    "parallel recovery slave next change",
    "nologging fetch slave idle",
    "recovery sender idle",
    "recovery receiver idle",
    "recovery coordinator idle",
    "recovery logmerger idle",
    "block compare coord process idle",
    "Data Guard PDB query SCN service idle",
    "True Cache: background process idle",
    "PX Deq: Txn Recovery Start",
    "PX Deq: Txn Recovery Reply",
    "fbar timer",
    "smon timer",
    "PX Deq: Metadata Update",
    "Space Manager: slave idle wait",
    "PX Deq: Index Merge Reply",
    "PX Deq: Index Merge Execute",
    "PX Deq: Index Merge Close",
    "PX Deq: kdcph_mai",
    "PX Deq: kdcphc_ack",
    "imco timer",
    "IMFS defer writes scheduler",
    "memoptimize write drain idle",
    "MLE sleep",
    "virtual circuit next request",
    "shared server idle wait",
    "dispatcher timer",
    "cmon timer",
    "pool server timer",
    "lreg timer",
    "JOX Jit Process Sleep",
    "jobq slave wait",
    "pipe get",
    "PX Deque wait",
    "PX Idle Wait",
    "PX Deq Credit: need buffer",
    "PX Deq Credit: send blkd",
    "PX Deq: Msg Fragment",
    "PX Deq: Parse Reply",
    "PX Deq: Execute Reply",
    "PX Deq: Execution Msg",
    "PX Deq: Table Q Normal",
    "PX Deq: Table Q Sample",
    "REPL Apply: txns",
    "REPL Capture/Apply: messages",
    "REPL Capture: archive log",
    "single-task message",
    "SQL*Net message from client",
    "SQL*Net vector message from client",
    "SQL*Net vector message from dblink",
    "PL/SQL lock timer",
    "Streams AQ: emn coordinator idle wait",
    "EMON slave idle wait",
    "Emon coordinator main loop",
    "Emon slave main loop",
    "Streams AQ: waiting for messages in the queue",
    "Streams AQ: waiting for time management or cleanup tasks",
    "Streams AQ: delete acknowledged messages",
    "Streams AQ: deallocate messages from Streams Pool",
    "Streams AQ: qmn coordinator idle wait",
    "Streams AQ: qmn slave idle wait",
    "AQ: 12c message cache init wait",
    "AQ Cross Master idle",
    "AQPC idle",
    "Streams AQ: load balancer idle",
    "Sharded Queues : Part Maintenance idle",
    "Sharded Queues : Part Truncate idle",
    "REPL Capture/Apply: RAC AQ qmn coordinator",
    "Streams AQ: opt idle",
    "HS message to agent",
    "ASM background timer",
    "ASM cluster membership changes",
    "AUTO access ASM_CLIENT registration",
    "iowp msg",
    "iowp file id",
    "netp network",
    "gopp msg",
    "auto-sqltune: wait graph update",
    "WCR: replay client notify",
    "WCR: replay clock",
    "WCR: replay paused",
    "JS external job",
    "cell worker idle",
    "Multi-Tenant Redo File Server - Flush Header Interval",
    "Sharding replication",
    "Consensus service idle",
    "Blockchain apply clean",
    "blockchain apply short",
    "blockchain apply long",
    "Blockchain reader process idle",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_event_names_resolve_to_their_class() {
        assert_eq!(event_class("db file sequential read"), Some(EventClass::Plotted(WaitClass::UserIo)));
        assert_eq!(event_class("log file sync"), Some(EventClass::Plotted(WaitClass::Commit)));
        assert_eq!(event_class("gc cr block 2-way"), Some(EventClass::Plotted(WaitClass::Cluster)));
        assert_eq!(event_class("resmgr:cpu quantum"), Some(EventClass::Scheduler));
    }

    #[test]
    fn truncated_names_use_prefix_lookup() {
        assert_eq!(
            event_class("enq: TX - row lock content"),
            Some(EventClass::Plotted(WaitClass::Application))
        );
        assert_eq!(event_class("SQL*Net message from clien"), Some(EventClass::Idle));
    }

    #[test]
    fn exact_match_wins_over_longer_names() {
        // "direct path read" is also a prefix of "direct path read temp"
        assert_eq!(event_class("direct path read"), Some(EventClass::Plotted(WaitClass::UserIo)));
        // "log file sync" is a prefix of "log file sync: SCN ordering" (Other)
        assert_eq!(event_class("log file sync"), Some(EventClass::Plotted(WaitClass::Commit)));
    }

    #[test]
    fn ambiguous_prefix_picks_alphabetically_first_entry() {
        // "latch: cache buffer" prefixes both "latch: cache buffer handles" (Other)
        // and "latch: cache buffers chains" (Concurrency).
        assert_eq!(event_class("latch: cache buffer"), Some(EventClass::Plotted(WaitClass::Other)));
    }

    #[test]
    fn unknown_events_have_no_class() {
        assert_eq!(event_class("not a real wait event"), None);
        assert_eq!(event_class("   "), None);
    }

    #[test]
    fn idle_and_other_events_are_not_summed() {
        assert_eq!(event_class("jobq slave wait").and_then(EventClass::summed_class), None);
        assert_eq!(event_class("latch free").and_then(EventClass::summed_class), None);
        assert!(is_idle("SQL*Net message from client"));
        assert!(!is_idle("SQL*Net message to client"));
    }

    #[test]
    fn event_table_is_large() {
        assert!(event_table_len() >= 600, "only {} events", event_table_len());
    }

    #[test]
    fn load_metric_labels_depend_on_block_label_set() {
        assert_eq!(load_metric_for_label("Logical reads", &LEGACY_BLOCK_LABELS), Some(LoadMetric::LogicalReads));
        assert_eq!(load_metric_for_label("Logical read", &LEGACY_BLOCK_LABELS), None);
        assert_eq!(load_metric_for_label("Logical read", &MODERN_BLOCK_LABELS), Some(LoadMetric::LogicalReads));
        assert_eq!(load_metric_for_label("W/A MB processed", &MODERN_BLOCK_LABELS), Some(LoadMetric::SqlWorkArea));
        assert_eq!(load_metric_for_label("Write IO requests", &MODERN_BLOCK_LABELS), Some(LoadMetric::WriteIoRequests));
    }

    #[test]
    fn every_load_metric_has_exactly_one_family() {
        let time = LoadMetric::ALL.iter().filter(|m| m.family() == UnitFamily::Time).count();
        let mb = LoadMetric::ALL.iter().filter(|m| m.family() == UnitFamily::Megabytes).count();
        let blocks = LoadMetric::ALL.iter().filter(|m| m.family() == UnitFamily::Blocks).count();
        let count = LoadMetric::ALL.iter().filter(|m| m.family() == UnitFamily::Count).count();
        assert_eq!((time, mb, blocks, count), (3, 4, 4, 11));
    }

    #[test]
    fn wait_class_labels_round_trip() {
        for class in WaitClass::ALL {
            assert_eq!(WaitClass::from_label(class.label()), Some(class));
        }
        assert_eq!(WaitClass::from_label("DB CPU"), None);
    }
}
