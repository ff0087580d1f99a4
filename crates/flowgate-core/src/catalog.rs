//! Pattern catalogs.
//!
//! Process-wide static data, compiled once at first use and never mutated at
//! runtime - extensibility is via recompilation, not live mutation, so guard
//! evaluation stays deterministic and side-effect free. Every pattern here
//! assumes its input already passed through the normalization boundary.
//!
//! Tie-break within a catalog: first matching entry wins; its label becomes
//! the short signal text of the block.

use once_cell::sync::Lazy;
use regex::Regex;

/// A compiled matcher with a human-readable label.
pub struct PatternEntry {
    pub matcher: Regex,
    pub label: &'static str,
}

fn entry(pattern: &str, label: &'static str) -> PatternEntry {
    PatternEntry {
        matcher: Regex::new(pattern).expect("catalog pattern must compile"),
        label,
    }
}

/// Destructive/irreversible operation signatures. A false negative here is
/// unacceptable regardless of source or workspace context, which is why the
/// guard that consumes this catalog always runs first.
pub static CRITICAL: Lazy<Vec<PatternEntry>> = Lazy::new(|| {
    vec![
        // Destructive filesystem commands
        entry(r"(?i)rm\s*-\s*rf", "recursive delete"),
        entry(r"(?i)rm\s*-\s*r\s*-\s*f", "recursive delete"),
        entry(r"(?i)rm\s*-\s*fr", "recursive delete"),
        entry(r"(?i)mkfs", "format disk"),
        entry(r"(?i)dd\s+if\s*=", "disk write"),
        entry(r"(?i)>\s*/dev/sd", "raw disk write"),
        entry(r"(?i)chmod\s+777", "unsafe permissions"),
        // Shell injection
        entry(r"(?i)eval\s+\$", "eval injection"),
        entry(r"(?i)exec\s+\$", "exec injection"),
        // Pipe to shell
        entry(r"(?i)curl[^|]*\|\s*(sh|bash)", "pipe to shell"),
        entry(r"(?i)wget[^|]*\|\s*(sh|bash)", "pipe to shell"),
        entry(r"(?i)curl.*&&\s*(sh|bash)", "download and execute"),
        entry(r"(?i)curl.*-o.*\.sh.*&&", "download then execute"),
        // Fork bombs across language idioms
        entry(r"(?i):\(\)\s*\{.*:\s*\|.*&.*\}", "fork bomb"),
        entry(r"(?i)\w+\(\)\s*\{[^}]*\w+\s*\|[^}]*\w+[^}]*&", "fork bomb function"),
        entry(r"(?i)os\.fork\(\)", "python fork bomb"),
        entry(r"(?i)perl.*fork.*while.*fork", "perl fork bomb"),
        // Remote execution
        entry(r"(?i)python.*-c.*exec\(", "python exec"),
        entry(r"(?i)python.*-c.*eval\(", "python eval"),
        entry(r"(?i)node.*-e.*eval\(", "node eval"),
        entry(r"(?i)powershell.*IEX", "powershell IEX"),
        entry(r"(?i)powershell.*Invoke-Expression", "powershell invoke"),
        entry(r"(?i)powershell.*DownloadString", "powershell download"),
        // Base64 decode-then-execute
        entry(r"(?i)base64.*-d.*\|\s*(sh|bash)", "base64 decode execute"),
        // Substitution wrapping a dangerous verb
        entry(r"(?i)\$\{[^}]*rm[^}]*\}", "variable expansion attack"),
        entry(r"(?i)`[^`]*rm[^`]*`", "backtick substitution"),
        entry(r"(?i)\$\([^)]*rm[^)]*\)", "command substitution"),
        entry(r"(?i)\{rm\s*,", "brace expansion attack"),
    ]
});

/// Absolute-path prefixes for sensitive roots. Exemptible only when the path
/// falls inside the request's declared workspace - except the UNC and /proc
/// entries, which are never exempted.
pub static ABSOLUTE_PATH: Lazy<Vec<PatternEntry>> = Lazy::new(|| {
    vec![
        entry(r"(?i)^/Users/", "macOS user directory"),
        entry(r"(?i)^/home/", "user home directory"),
        entry(r"(?i)^/root/", "root home directory"),
        entry(r"(?i)^/var/", "system var directory"),
        entry(r"(?i)^/etc/", "system configuration"),
        entry(r"(?i)^/tmp/", "temporary directory"),
        entry(r"(?i)^/proc/", "process filesystem"),
        entry(r"(?i)^/sys/", "sys filesystem"),
        entry(r"(?i)^/dev/", "device files"),
        entry(r"(?i)^/Volumes/", "mounted volume"),
        entry(r"(?i)^[A-Za-z]:[\\/]", "Windows drive root"),
        entry(r"^~/", "home shorthand"),
        entry(r"^[\\/][\\/]", "UNC path"),
    ]
});

/// Absolute-path shapes that are never workspace-exempt: network shares and
/// the /proc symlink-attack surface can escape any declared workspace.
pub static NEVER_EXEMPT_PATH: Lazy<Vec<PatternEntry>> = Lazy::new(|| {
    vec![
        entry(r"^[\\/][\\/]", "UNC path"),
        entry(r"(?i)/proc/self", "proc symlink target"),
        entry(r"(?i)/proc/\d+", "process filesystem"),
    ]
});

/// Traversal sequences, plain and encoded. Traversal can escape any declared
/// workspace, so these are always-deny.
pub static TRAVERSAL: Lazy<Vec<PatternEntry>> = Lazy::new(|| {
    vec![
        entry(r"\.\./", "path traversal"),
        entry(r"\.\.\\", "path traversal (backslash)"),
        entry(r"(?i)\.\.%2f", "encoded path traversal"),
        entry(r"(?i)\.\.%252f", "double-encoded path traversal"),
        entry(r"(?i)%2f\.\.%2f", "fully encoded path traversal"),
    ]
});

/// Verbs that modify or destroy state.
pub const DANGEROUS_VERBS: &[&str] = &[
    "delete", "remove", "destroy", "erase", "wipe", "purge", "kill", "terminate", "add", "commit",
    "push", "create", "write", "modify", "overwrite", "update", "format",
];

/// Whole-word/compound matchers for each dangerous verb. Non-letter
/// separators count as boundaries, so `delete_all` and `force_add` match
/// while `additional` does not.
pub static ACTION_VERBS: Lazy<Vec<PatternEntry>> = Lazy::new(|| {
    DANGEROUS_VERBS
        .iter()
        .map(|verb| PatternEntry {
            matcher: Regex::new(&format!(r"(?i)(^|[^a-z]){}([^a-z]|$)", verb))
                .expect("verb pattern must compile"),
            label: verb,
        })
        .collect()
});

/// Natural-language imperative form ("please delete ...").
pub static IMPERATIVE_ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)please\s+(delete|remove|destroy|wipe|purge|add|create|modify)")
        .expect("imperative pattern must compile")
});

/// First matching entry of a catalog, if any.
pub fn first_match<'c>(catalog: &'c [PatternEntry], value: &str) -> Option<&'c PatternEntry> {
    catalog.iter().find(|e| e.matcher.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_catalogs_compile() {
        // Lazy statics fail fast here rather than mid-request.
        assert!(!CRITICAL.is_empty());
        assert!(!ABSOLUTE_PATH.is_empty());
        assert!(!NEVER_EXEMPT_PATH.is_empty());
        assert!(!TRAVERSAL.is_empty());
        assert!(!ACTION_VERBS.is_empty());
        assert!(IMPERATIVE_ACTION.is_match("please delete it"));
    }

    #[test]
    fn test_first_match_tie_break() {
        // "rm -rf" matches the first recursive-delete entry, not later ones.
        let hit = first_match(&CRITICAL, "rm -rf /").unwrap();
        assert_eq!(hit.label, "recursive delete");
    }

    #[test]
    fn test_critical_fork_bomb_shapes() {
        assert!(first_match(&CRITICAL, ":(){ :|:& };:").is_some());
        assert!(first_match(&CRITICAL, "bomb() { bomb | bomb & }").is_some());
        assert!(first_match(&CRITICAL, "python -c import os; os.fork()").is_some());
    }

    #[test]
    fn test_critical_substitution_wrapping_rm() {
        assert!(first_match(&CRITICAL, "${x:-rm -r}").is_some());
        assert!(first_match(&CRITICAL, "`rm -r /`").is_some());
        assert!(first_match(&CRITICAL, "$(rm -r /)").is_some());
        // Benign substitution without a dangerous verb flows.
        assert!(first_match(&CRITICAL, "$(pwd)").is_none());
    }

    #[test]
    fn test_traversal_variants() {
        for sample in ["../etc", r"..\windows", "..%2Fetc", "..%252Fetc", "%2F..%2F"] {
            assert!(first_match(&TRAVERSAL, sample).is_some(), "missed {sample}");
        }
        assert!(first_match(&TRAVERSAL, "src/lib.rs").is_none());
    }

    #[test]
    fn test_absolute_path_prefixes() {
        for sample in ["/etc/passwd", "/home/me/x", "C:/Windows", r"C:\Windows", "~/secrets"] {
            assert!(first_match(&ABSOLUTE_PATH, sample).is_some(), "missed {sample}");
        }
        assert!(first_match(&ABSOLUTE_PATH, "relative/path").is_none());
    }

    #[test]
    fn test_action_verb_compounds() {
        let delete = ACTION_VERBS.iter().find(|e| e.label == "delete").unwrap();
        assert!(delete.matcher.is_match("delete"));
        assert!(delete.matcher.is_match("delete_all"));
        assert!(delete.matcher.is_match("force-delete"));
        assert!(!delete.matcher.is_match("deleted"));

        let add = ACTION_VERBS.iter().find(|e| e.label == "add").unwrap();
        assert!(add.matcher.is_match("force_add"));
        assert!(!add.matcher.is_match("address"));
        assert!(!add.matcher.is_match("additional"));
    }
}
