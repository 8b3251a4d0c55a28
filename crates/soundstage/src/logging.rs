//! Internal module to handle logging.
//!
//! The engine wants to log from the audio thread: when it switches filters, when it has no dataset and is outputting
//! silence, and so on.  The audio thread cannot allocate or do I/O, and the handler installed behind the log crate
//! almost certainly does both.  So we use a ringbuffer.  The `rt_level` macros here work (mostly) like the macros
//! from the log crate:
//!
//! - On threads which are not marked as audio threads, they forward to the macros from the log crate.
//! - On audio threads, they format into a fixed-size inline buffer and push to a ringbuffer, which is drained by a
//!   background thread that converts them to the log crate.
//!
//! We indicate when messages were truncated, and when messages were dropped because the background thread was too
//! slow to keep up.  Timestamps the user sees are the time the log crate got the message, not when it happened, so
//! when delivery is late we append how late it was.
//!
//! When a message is enqueued, we unpark the background thread.  When not under load the thread wakes and writes the
//! message out almost immediately; under load the OS can preempt it, which we can't control.
use std::fmt::Arguments as FmtArgs;
use std::thread::{park, JoinHandle};
use std::time::{Duration, Instant};

use arrayvec::ArrayString;
use thingbuf::{recycling::Recycle, ThingBuf};

// The following two values reserve around `LOG_LENGTH_LIMIT * LOG_QUEUE_LENGTH` bytes for the log queue.  The engine
// logs at most a couple of messages per super-block, so this is generous.

const LOG_LENGTH_LIMIT: usize = 256;
const LOG_QUEUE_LENGTH: usize = 1024;

/// If logging falls this far behind, start warning the user.
const WARN_LATENCY: Duration = Duration::from_millis(250);

type InlineLogMessage = ArrayString<LOG_LENGTH_LIMIT>;

/// A log message can either be a fixed-size static string, or something formatted to an inline buffer.
#[derive(Debug)]
#[allow(clippy::large_enum_variant)] //because this is basically Cow.
pub(crate) enum LogMessage {
    Static(&'static str),
    Inline(InlineLogMessage),
}

struct LogRecordRecycler;

pub(crate) struct LogRecord {
    /// If a thread detects that it was unable to enqueue messages, it sets this value.
    skipped_messages: u64,

    level: log::Level,

    /// Output of the `module_path!` macro.
    module: &'static str,

    message: LogMessage,

    /// This message might have been truncated. Was it?
    truncated: bool,

    /// The instant at which this log message was put together and enqueued.
    enqueue_time: Instant,
}

/// The arrayvec crate does not support formatting in a way which would let us detect truncations.  This formatter
/// pushes things to a log message until it's full, then sets truncated to true.
///
/// On truncation, it just keeps going and throws out the values.
struct LogMessageFormatter<'a> {
    log_message: &'a mut InlineLogMessage,
    truncated: &'a mut bool,
}

impl<'a> std::fmt::Write for LogMessageFormatter<'a> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        if *self.truncated {
            return Ok(());
        }

        // Careful: ArrayString capacity is in bytes.
        if s.len() <= self.log_message.remaining_capacity() {
            self.log_message.push_str(s);
            return Ok(());
        }

        *self.truncated = true;

        // Push whole characters until we can't anymore, so that the message stays valid UTF-8.
        for c in s.chars() {
            if self.log_message.try_push(c).is_err() {
                return Ok(());
            }
        }

        Ok(())
    }
}

/// Build a log message.
///
/// The returned message has skipped_messages set to 0. This is then fixed up by the caller, where the actual enqueueing
/// happens.
pub(crate) fn build_log_message(
    level: log::Level,
    args: FmtArgs<'_>,
    module: &'static str,
) -> LogRecord {
    use std::fmt::Write;

    let mut truncated = false;

    let message = match args.as_str() {
        Some(m) => LogMessage::Static(m),
        None => {
            let mut buf = InlineLogMessage::new();

            let mut formatter = LogMessageFormatter {
                truncated: &mut truncated,
                log_message: &mut buf,
            };

            // Our formatter never fails, but user Display impls might; what we have so far is still worth logging.
            let _ = write!(formatter, "{}", args);

            LogMessage::Inline(buf)
        }
    };

    LogRecord {
        skipped_messages: 0,
        level,
        message,
        module,
        truncated,
        enqueue_time: Instant::now(),
    }
}

impl Recycle<LogRecord> for LogRecordRecycler {
    fn new_element(&self) -> LogRecord {
        LogRecord {
            skipped_messages: 0,
            level: log::Level::Debug,
            enqueue_time: Instant::now(),
            message: LogMessage::Static("NOT SET"),
            module: module_path!(),
            truncated: false,
        }
    }

    fn recycle(&self, _element: &mut LogRecord) {
        // No-op; we'll just overwrite it on the next time round.
    }
}

/// Global state stored in a static for the logger.
struct LogCtx {
    /// Wake this thread when messages arrive.
    thread: JoinHandle<()>,

    /// Send messages here, if possible.
    message_queue: ThingBuf<LogRecord, LogRecordRecycler>,
}

fn setup_ctx() -> LogCtx {
    // This isn't recursive access to the lazy_static because the "recursive" part is in the background thread, which
    // will block until we finish.
    let thread = std::thread::Builder::new()
        .name("soundstage-log".into())
        .spawn(background_thread_mainloop)
        .unwrap_or_else(|e| panic!("Unable to spawn the logging thread: {e}"));
    let message_queue = ThingBuf::with_recycle(LOG_QUEUE_LENGTH, LogRecordRecycler);

    LogCtx {
        thread,
        message_queue,
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_CTX: LogCtx = setup_ctx();
}

/// Dispatch a log message to the background thread.
///
/// This is the entrypoint for the macro.
pub(crate) fn dispatch_message(level: log::Level, args: FmtArgs<'_>, module: &'static str) {
    use std::cell::Cell;

    thread_local! {
        static SKIPPED_MESSAGES: Cell<u64> = const { Cell::new(0) };
    }

    if level > log::max_level() {
        return;
    }

    let mut record = build_log_message(level, args, module);
    record.skipped_messages = SKIPPED_MESSAGES.get();

    match GLOBAL_CTX.message_queue.push(record) {
        Ok(_) => {
            // The background thread now knows about the skipped messages.
            SKIPPED_MESSAGES.replace(0);
            GLOBAL_CTX.thread.thread().unpark();
        }
        Err(_) => {
            SKIPPED_MESSAGES.replace(SKIPPED_MESSAGES.get() + 1);
        }
    }
}

/// Convert a single log message to the log crate's macros and spit it out.
fn log_one(record: LogRecord) {
    let msg_str = match &record.message {
        LogMessage::Static(s) => s,
        LogMessage::Inline(i) => i.as_str(),
    };

    let latency = Instant::now() - record.enqueue_time;

    if record.skipped_messages != 0 {
        log::warn!(
            "SoundStage's background logging thread fell behind!  {} messages have been dropped!",
            record.skipped_messages
        );
    }

    let mut latency_part_bytes: smallvec::SmallVec<[u8; 256]> = smallvec::SmallVec::new();

    if latency > WARN_LATENCY {
        use std::io::Write;

        // Writing to a smallvec can't fail.
        let _ = write!(
            latency_part_bytes,
            ", delayed by {} seconds",
            latency.as_secs_f64()
        );
    }

    let latency_part = std::str::from_utf8(&latency_part_bytes[..]).unwrap_or("");
    let truncated_part = if record.truncated { ", truncated" } else { "" };

    log::log!(target: record.module, record.level, "{} (from audio thread{latency_part}{truncated_part})", msg_str);
}

fn drain_queue() {
    while let Some(msg) = GLOBAL_CTX.message_queue.pop() {
        log_one(msg);
    }
}

/// Drain the queue. Park. Repeat forever.
fn background_thread_mainloop() {
    loop {
        drain_queue();
        // If another message gets between draining and parking, the thread's token has returned before the park and all
        // is well.
        park();
    }
}

/// Same as the log macro, but realtime-safe and the target is always the current module.
#[allow(clippy::crate_in_macro_def)] // This is private.
macro_rules! rt_log {
    ($level: expr, $fmt: expr $(, $args: expr)* $(,)?) => {
        let macro_level = $level;
        if crate::is_audio_thread::is_audio_thread() && macro_level <= log::max_level() {
            crate::logging::dispatch_message(macro_level, format_args!($fmt, $($args),*), module_path!());
        } else {
            log::log!(macro_level, $fmt, $($args),*);
        }
    }
}

#[allow(unused_macros)]
macro_rules! rt_error {
    ($($arg: tt)+) => {
        rt_log!(log::Level::Error, $($arg)*);
    }
}

macro_rules! rt_warn {
    ($($args:tt)+) => {
        rt_log!(log::Level::Warn, $($args)*);
    }
}

#[allow(unused_macros)]
macro_rules! rt_info {
    ($($args: tt)+) => {
        rt_log!(log::Level::Info, $($args)*);
    }
}

macro_rules! rt_debug {
    ($($args: tt)+) => {
        rt_log!(log::Level::Debug, $($args)*);
    }
}

macro_rules! rt_trace {
    ($($args: tt)+) => {
        rt_log!(log::Level::Trace, $($args)*);
    }
}

/// Ensure that the lazy_static is set up so that this module works.
///
/// Called when constructing spatializers, so that the logging thread never spawns on an audio thread.
pub(crate) fn ensure_log_ctx() {
    std::hint::black_box(GLOBAL_CTX.message_queue.capacity());
}
