//! Output parsers for the window listing commands.

use crate::backend::WindowInfo;

/// Field separator used by the AppleScript listing.
pub(crate) const APPLESCRIPT_SEPARATOR: char = '|';

/// Parse `wmctrl -l -p -G` output.
///
/// ```text
/// 0x02c00004  0 12345   0    0    1920 1080  hostname Window Title
/// ```
///
/// Sticky windows (desktop -1) such as panels are skipped.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn parse_wmctrl_windows(output: &str) -> Vec<WindowInfo> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 8 || parts[1] == "-1" {
                return None;
            }
            let handle = u64::from_str_radix(parts[0].trim_start_matches("0x"), 16).ok()?;
            Some(WindowInfo {
                handle,
                title: parts[8..].join(" "),
                app_name: String::new(),
                pid: parts[2].parse().unwrap_or(0),
                x: parts[3].parse().unwrap_or(0),
                y: parts[4].parse().unwrap_or(0),
                width: parts[5].parse().unwrap_or(0),
                height: parts[6].parse().unwrap_or(0),
                is_focused: false,
            })
        })
        .collect()
}

/// Parse the AppleScript listing: one window per line,
/// `app|pid|title|x|y|width|height|frontmost`.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn parse_applescript_windows(output: &str) -> Vec<WindowInfo> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.trim().split(APPLESCRIPT_SEPARATOR).collect();
            if parts.len() != 8 {
                return None;
            }
            let pid: u32 = parts[1].trim().parse().ok()?;
            Some(WindowInfo {
                handle: u64::from(pid),
                title: parts[2].to_string(),
                app_name: parts[0].to_string(),
                pid,
                x: parts[3].trim().parse().unwrap_or(0),
                y: parts[4].trim().parse().unwrap_or(0),
                width: parts[5].trim().parse().unwrap_or(0),
                height: parts[6].trim().parse().unwrap_or(0),
                is_focused: parts[7].trim() == "true",
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wmctrl() {
        let output = "\
0x02c00004  0 12345   10   20   1920 1080  box Editor - notes.txt
0x01800003 -1 2222    0    0    1920 32    box Top Panel
0x03400007  1 555     300  400  640  480   box Terminal
";
        let windows = parse_wmctrl_windows(output);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].handle, 0x02c00004);
        assert_eq!(windows[0].title, "Editor - notes.txt");
        assert_eq!(windows[0].pid, 12345);
        assert_eq!((windows[0].x, windows[0].y), (10, 20));
        assert_eq!((windows[1].width, windows[1].height), (640, 480));
    }

    #[test]
    fn test_parse_wmctrl_skips_garbage() {
        assert!(parse_wmctrl_windows("not a window line\n\n").is_empty());
        assert!(parse_wmctrl_windows("zz 0 1 0 0 10 10 host title").is_empty());
    }

    #[test]
    fn test_parse_applescript() {
        let output = "Safari|812|Start Page|0|25|1440|875|true\nTerminal|901|zsh|100|100|800|600|false\n";
        let windows = parse_applescript_windows(output);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].app_name, "Safari");
        assert_eq!(windows[0].handle, 812);
        assert!(windows[0].is_focused);
        assert_eq!(windows[1].y, 100);
        assert!(!windows[1].is_focused);
    }

    #[test]
    fn test_parse_applescript_rejects_short_lines() {
        assert!(parse_applescript_windows("Finder|1|x").is_empty());
    }
}
