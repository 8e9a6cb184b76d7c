/// Prints a (possibly colored) message unless `$quiet` is set and always
/// appends its plain-text form to `$file`. A `$heading` above zero turns the
/// line into a markdown heading of that level in the file.
#[macro_export]
macro_rules! make_notes {
    ($file:expr, $quiet:expr, $heading:literal, $($arg:tt)*) => {{
        use std::io::Write;
        // if $quiet is false we will write output to screen
        if !$quiet {
            print!($($arg)*);
        }

        let formatted = format!($($arg)*);
        let mut plain = $crate::tools::strip_ansi(&formatted);

        if $heading > 0 {
            let prefix = "#".repeat($heading as usize);
            plain = format!("{} {}\n", prefix, plain.trim());
        }

        // A log file that can't be written must not stop the run.
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&$file)
        {
            let _ = write!(file, "{}", plain);
        }
    }};
}

#[macro_export]
macro_rules! debug_trace {
    ($($arg:tt)*) => {{
        use std::io::Write;

        if let Ok(trace_file) = std::env::var("AWR_TREND_TRACE") {
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(trace_file)
            {
                let _ = writeln!(file, "{}", format_args!($($arg)*));
            }
        }
    }};
}

#[macro_export]
macro_rules! debug_note {
    ($($arg:tt)*) => {{
        let time = $crate::tools::get_timestamp();
        let file = file!();
        let line = line!();
        $crate::debug_trace!(
            "[{}] [{}:{}] {}",
            time,
            file,
            line,
            format_args!($($arg)*)
        );
    }};
}
