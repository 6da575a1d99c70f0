//! User-Friendly Error Formatting
//!
//! Provides user-friendly error messages with troubleshooting hints
//! for common error scenarios.

use std::fmt::Write;

/// Format error for user consumption
///
/// Takes technical error and produces user-friendly message with
/// troubleshooting steps and context.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    // Header
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    // Match against the whole context chain, not just the outermost message
    let error_msg = format!("{:#}", error);

    if error_msg.contains("config") {
        format_config_error(&mut output, &error_msg);
    } else if error_msg.contains("frame") || error_msg.contains("Frame") {
        format_frames_error(&mut output, &error_msg);
    } else if error_msg.contains("Actuat") || error_msg.contains("actuat") {
        format_actuation_error(&mut output, &error_msg);
    } else {
        format_generic_error(&mut output, &error_msg);
    }

    // Technical details
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    // Footer with help
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: gaze-pointer -vv"
    )
    .ok();
    writeln!(
        &mut output,
        "  - Per-sample detector output: RUST_LOG=gaze_pointer=trace"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();

    output
}

fn format_config_error(output: &mut String, _error: &str) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with configuration file.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Configuration file not found").ok();
    writeln!(
        output,
        "     → Specify: gaze-pointer -c /path/to/gaze-pointer.toml"
    )
    .ok();
    writeln!(output, "     → Or omit -c to run with built-in defaults").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid TOML syntax").ok();
    writeln!(output, "     → Check for typos, missing quotes, etc.").ok();
    writeln!(
        output,
        "     → Section names: screen, tracking, mapping, detector, cursor, logging"
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "  3. Invalid values").ok();
    writeln!(output, "     → Screen width and height must be non-zero").ok();
    writeln!(
        output,
        "     → Log format must be 'pretty', 'compact' or 'json'"
    )
    .ok();
}

fn format_frames_error(output: &mut String, _error: &str) {
    writeln!(output, "Frame Recording Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not read the landmark recording.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Recording file not found").ok();
    writeln!(output, "     → Check the path passed to --frames").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Malformed line").ok();
    writeln!(output, "     → One JSON object per line:").ok();
    writeln!(
        output,
        "       {{\"timestamp_ms\": 16, \"landmarks\": [[0.41, 0.52], ...]}}"
    )
    .ok();
    writeln!(
        output,
        "     → Use \"landmarks\": null for frames without a face"
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "  3. Timestamps out of order").ok();
    writeln!(output, "     → timestamp_ms must never decrease").ok();
}

fn format_actuation_error(output: &mut String, _error: &str) {
    writeln!(output, "Pointer Actuation Error").ok();
    writeln!(output).ok();
    writeln!(output, "The pointer actuation thread stopped unexpectedly.").ok();
    writeln!(output).ok();
    writeln!(output, "Troubleshooting:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Look for a panic message above this one").ok();
    writeln!(output, "  2. Re-run with -vv to see every dispatched stroke").ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Gaze Pointer Error").ok();
    writeln!(output).ok();
    writeln!(output, "An error occurred while replaying the recording.").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
}
