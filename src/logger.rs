use std::{fs, io, path::PathBuf};

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        println!("\x1b[32m[INFO] [{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        println!("\x1b[33m[LOG]  [{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        println!("\x1b[35m[WARN] [{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        println!("\x1b[31m[ERROR][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        panic!("\x1b[1;31m[FATAL][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

/// Per-object viewer traffic. Only printed when `LOG_FLEET_EVENTS` is set.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var("LOG_FLEET_EVENTS").is_ok() {
            println!("\x1b[36m[EVENT][{}]\x1b[0m {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
        }
    };
}

/// Root directory for all JSON dumps.
const DUMP_ROOT: &str = "./dumps";

/// Types that can write themselves as pretty JSON into `./dumps/<dir_name>/<file_name>`.
pub trait JsonDump: serde::Serialize {
    /// File name of the dump, including the extension.
    fn file_name(&self) -> String;

    /// Sub directory below the dump root.
    fn dir_name(&self) -> &'static str;

    /// Serializes `self` and writes it to disk. Failures are logged, never propagated.
    fn dump_json(&self) {
        if let Err(e) = self.try_dump_json() {
            crate::warn!("Could not dump {}: {e}", self.file_name());
        }
    }

    /// Serializes `self` and writes it to disk, returning the written path.
    fn try_dump_json(&self) -> io::Result<PathBuf> {
        let dir = PathBuf::from(DUMP_ROOT).join(self.dir_name());
        fs::create_dir_all(&dir)?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}
