//! Console report formatting.
//!
//! Human-readable output, not machine-parsed: a banner of connection
//! parameters, one `[NNNN]` line per message, and a summary line that is
//! printed on every exit path so partial progress stays visible. All
//! builders are pure string functions; the drivers do the printing.

use crate::codec::CodePage;
use crate::config::ConnectionConfig;

/// Horizontal rule used between report sections.
pub const RULE: &str = "------------------------------------------------------------";

/// Printed by a browse run that found the queue already empty.
pub const NO_BROWSE_MESSAGES: &str = "No messages available for browse.";

/// Banner of connection parameters printed before any operation.
pub fn banner(title: &str, config: &ConnectionConfig) -> String {
    format!(
        "{title}\n\
         Host      : {}\n\
         Channel   : {}\n\
         Queue     : {}\n\
         Queue Mgr : {}\n\
         {RULE}",
        config.host_port, config.channel, config.queue_name, config.qmgr_name
    )
}

/// One message line: 4-digit zero-padded sequence number plus content.
pub fn message_line(seq: u32, text: &str) -> String {
    format!("[{seq:04}] {text}")
}

/// One producer line per message sent.
pub fn sent_line(seq: u32, bytes: usize, codepage: &CodePage, text: &str) -> String {
    format!("[{seq:04}] Sent ({bytes} bytes {}): {text}", codepage.name)
}

pub fn drain_header() -> String {
    "Draining queue... (press Ctrl+C to stop early)\n".to_string()
}

pub fn drain_summary(consumed: u32) -> String {
    let mut summary = format!("{RULE}\nFinished. Total messages consumed: {consumed}");
    if consumed == 0 {
        summary.push_str("\nQueue was empty or inaccessible.");
    }
    summary
}

pub fn browse_header(max_messages: u32) -> String {
    format!("Browsing up to {max_messages} message(s) (non-destructive)...\n")
}

pub fn browse_summary(browsed: u32) -> String {
    format!("\n{RULE}\nBrowse complete. Messages browsed: {browsed}")
}

pub fn produce_header(count: u32, codepage: &CodePage) -> String {
    format!("Putting {count} messages (EBCDIC {})...\n", codepage.name)
}

pub fn produce_summary(sent: u32) -> String {
    format!("{RULE}\nFinished. Total messages sent: {sent}")
}

pub fn depth_summary(qmgr_name: &str, queue_name: &str, depth: u32) -> String {
    format!(
        "Queue manager : {qmgr_name}\n\
         Queue         : {queue_name}\n\
         {RULE}\n\
         Current depth : {depth} messages"
    )
}
