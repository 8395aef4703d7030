use std::{
    io::Write,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError, TryLockError},
};

use core::str::FromStr;

use termcolor::{WriteColor, StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use rustc_hash::FxHashMap;

use compact_str::CompactString;

use dynarr::{
    DynamicArray,
    trace::{Event, EventKind},
};

mod error;
mod fmt;

pub use error::LogError;
pub use fmt::{LogFmt, LogFmtBuilder, LogSpec, SegmentSpec};

pub type Result<T> = core::result::Result<T, LogError>;

/// Handle to a format registered with [`custom_fmt`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CustomFmt(usize);

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

pub enum LevelFmt {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Other(CustomFmt, Level),
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

/// Per-target maximum levels, parsed from `RUST_LOG` syntax.
///
/// `trace` sets the base level, `my_crate::module=debug` sets the level of a
/// target and everything below it. Entries with unknown levels are ignored.
/// A target listed twice keeps the lower of its levels.
#[derive(Clone, Debug)]
pub struct Filters {
    target_levels: FxHashMap<CompactString, Level>,
    base_level: Level,
}

impl Filters {

    pub fn parse(spec: &str) -> Self {
        let mut filters = Self::default();
        for arg in spec.split(',') {
            let (target, level) = match arg.find('=') {
                Some(i) => (Some(arg[..i].trim()), arg[i + 1..].trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            match target {
                Some(target) => {
                    let entry = filters.target_levels
                        .entry(CompactString::new(target))
                        .or_insert(level);
                    *entry = (*entry).min(level);
                },
                None => filters.base_level = level,
            }
        }
        filters
    }

    fn from_env() -> Self {
        std::env::var("RUST_LOG")
            .map(|env| Self::parse(&env))
            .unwrap_or_default()
    }

    /// Level of the closest configured ancestor of `target`, walking up `::`
    /// separated paths, or the base level.
    pub fn target_level(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }

    #[inline(always)]
    pub fn base_level(&self) -> Level {
        self.base_level
    }
}

impl Default for Filters {

    fn default() -> Self {
        Self {
            target_levels: FxHashMap::default(),
            base_level: Level::Error,
        }
    }
}

struct Logger<W: WriteColor> {
    out: W,
    info_fmt: LogFmt,
    warn_fmt: LogFmt,
    error_fmt: LogFmt,
    debug_fmt: LogFmt,
    trace_fmt: LogFmt,
    custom_fmt: DynamicArray<LogFmt>,
    filters: Filters,
}

impl<W: WriteColor> Logger<W> {

    fn new(out: W, filters: Filters) -> Self {
        Self {
            out,
            error_fmt: LogFmt::labeled("error", Color::Red),
            warn_fmt: LogFmt::labeled("warn", Color::Yellow),
            info_fmt: LogFmt::labeled("info", Color::Green),
            debug_fmt: LogFmt::labeled("debug", Color::Blue),
            trace_fmt: LogFmt::labeled("trace", Color::Cyan),
            custom_fmt: DynamicArray::new(),
            filters,
        }
    }

    fn log(&mut self, target: &str, level: LevelFmt, msg: core::fmt::Arguments) -> Result<bool> {
        let target_level = self.filters.target_level(target);
        let (fmt, level) = match level {
            LevelFmt::Error => (&self.error_fmt, Level::Error),
            LevelFmt::Warn => (&self.warn_fmt, Level::Warn),
            LevelFmt::Info => (&self.info_fmt, Level::Info),
            LevelFmt::Debug => (&self.debug_fmt, Level::Debug),
            LevelFmt::Trace => (&self.trace_fmt, Level::Trace),
            LevelFmt::Other(fmt, level) => (self.custom_fmt.at(fmt.0)?, level),
        };
        if target_level < level {
            return Ok(false)
        }
        for segment in fmt {
            let log_spec = match segment {
                SegmentSpec::Message(log_spec) |
                SegmentSpec::Target(log_spec) |
                SegmentSpec::Text(_, log_spec) => log_spec,
            };
            if let Some(color_spec) = &log_spec.color_spec {
                self.out.set_color(color_spec)?;
            }
            match segment {
                SegmentSpec::Message(_) => write!(self.out, "{}", msg)?,
                SegmentSpec::Target(_) => self.out.write_all(target.as_bytes())?,
                SegmentSpec::Text(text, _) => self.out.write_all(text.as_bytes())?,
            }
            if log_spec.color_spec.is_some() {
                self.out.reset()?;
            }
        }
        self.out.write_all(b"\n")?;
        Ok(true)
    }

    fn log_relocation(&mut self, event: &Event) -> Result<bool> {
        let action = match event.kind {
            EventKind::Grow => "grow",
            EventKind::Reserve => "reserve",
            EventKind::ExactFit => "exact fit",
            EventKind::Shrink => "shrink",
        };
        self.log(
            RELOCATION_TARGET,
            LevelFmt::Trace,
            format_args!(
                "{} DynamicArray<{}>: len {}, capacity {} -> {} ({} bytes)",
                action, event.type_name, event.len,
                event.old_capacity, event.new_capacity,
                event.new_capacity.saturating_mul(event.elem_size),
            ),
        )
    }
}

static LOGGER: OnceLock<Mutex<Logger<StandardStream>>> = OnceLock::new();

#[inline(always)]
fn logger_cell() -> &'static Mutex<Logger<StandardStream>> {
    LOGGER.get_or_init(|| Mutex::new(Logger::new(
        StandardStream::stderr(ColorChoice::Auto),
        Filters::from_env(),
    )))
}

#[inline(always)]
fn logger() -> MutexGuard<'static, Logger<StandardStream>> {
    logger_cell().lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reads `RUST_LOG` and opens stderr. Logging initializes lazily otherwise.
pub fn init() {
    logger_cell();
}

/// Replaces the filters read from `RUST_LOG`.
pub fn set_filters(filters: Filters) {
    logger().filters = filters;
}

#[inline(always)]
pub fn error_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    let mut logger = logger();
    f(&mut LogFmtBuilder::new(&mut logger.error_fmt));
}

#[inline(always)]
pub fn warn_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    let mut logger = logger();
    f(&mut LogFmtBuilder::new(&mut logger.warn_fmt));
}

#[inline(always)]
pub fn info_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    let mut logger = logger();
    f(&mut LogFmtBuilder::new(&mut logger.info_fmt));
}

#[inline(always)]
pub fn debug_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    let mut logger = logger();
    f(&mut LogFmtBuilder::new(&mut logger.debug_fmt));
}

#[inline(always)]
pub fn trace_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    let mut logger = logger();
    f(&mut LogFmtBuilder::new(&mut logger.trace_fmt));
}

pub fn custom_fmt(fmt: LogFmt) -> CustomFmt {
    let mut logger = logger();
    logger.custom_fmt.push_back(fmt);
    CustomFmt(logger.custom_fmt.len() - 1)
}

#[inline(always)]
pub fn log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    logger().log(target, level, args)
}

/// Like [`log`], but drops the message instead of blocking when the logger is
/// in use, including by the calling thread.
pub fn try_log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    match try_logger() {
        Some(mut logger) => logger.log(target, level, args),
        None => Ok(false),
    }
}

#[inline(always)]
fn try_logger() -> Option<MutexGuard<'static, Logger<StandardStream>>> {
    match logger_cell().try_lock() {
        Ok(logger) => Some(logger),
        Err(TryLockError::Poisoned(err)) => Some(err.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}

/// Target of the buffer relocation messages emitted after [`install`].
pub const RELOCATION_TARGET: &str = "dynarr";

/// Routes buffer relocations of every `DynamicArray` to trace level under
/// [`RELOCATION_TARGET`].
///
/// Returns `false` if another relocation hook was installed first.
pub fn install() -> bool {
    init();
    dynarr::set_trace_hook(log_relocation)
}

fn log_relocation(event: &Event) {
    if let Some(mut logger) = try_logger() {
        // the hook has nowhere to report a failed stderr write
        let _ = logger.log_relocation(event);
    }
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}
