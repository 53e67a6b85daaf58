//! Passcode gate in front of the tracker.
//!
//! Unlocking writes a marker into a session-scoped store. This keeps casual
//! users out of the list; it is not authentication and does nothing against
//! anyone who can read the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CodeCartError, Result};
use crate::storage::{self, FileStorage, Storage, AUTH_KEY};

/// Environment variable naming the current session.
pub const SESSION_ENV: &str = "CODECART_SESSION";

const SESSIONS_DIR: &str = "sessions";
const PPID_PREFIX: &str = "ppid-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

/// Decides whether a submitted secret opens the gate.
pub trait Verifier {
    fn verify(&self, secret: &str) -> bool;
}

/// Accepts exactly the configured passcode. An empty passcode accepts nothing.
pub struct PasscodeVerifier {
    passcode: String,
}

impl PasscodeVerifier {
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
        }
    }
}

impl Verifier for PasscodeVerifier {
    fn verify(&self, secret: &str) -> bool {
        !self.passcode.is_empty() && secret.trim() == self.passcode
    }
}

/// What `unlock` leaves in the session store.
///
/// `stamp` ties the marker to one process lifetime. A marker whose stamp
/// differs from the current session's belongs to an earlier process that
/// happened to get the same session id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMarker {
    pub authenticated: bool,
    pub stamp: Option<String>,
}

pub struct AccessGate<S: Storage> {
    state: GateState,
    session: S,
    stamp: Option<String>,
}

impl<S: Storage> AccessGate<S> {
    /// Unlocked if the session carries a marker with a matching `stamp`,
    /// locked otherwise.
    pub fn open(session: S, stamp: Option<String>) -> Self {
        let unlocked = match storage::load_stored::<AuthMarker, _>(&session, AUTH_KEY) {
            Some(marker) if marker.authenticated && marker.stamp == stamp => true,
            Some(_) => {
                tracing::info!("ignoring unlock marker from an earlier session");
                false
            }
            None => false,
        };
        let state = if unlocked {
            GateState::Unlocked
        } else {
            GateState::Locked
        };
        Self {
            state,
            session,
            stamp,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Try `secret` against `verifier`. Returns whether the gate is now open.
    pub fn unlock(&mut self, secret: &str, verifier: &dyn Verifier) -> Result<bool> {
        if !verifier.verify(secret) {
            tracing::info!("unlock rejected");
            return Ok(false);
        }

        let marker = AuthMarker {
            authenticated: true,
            stamp: self.stamp.clone(),
        };
        storage::save(&self.session, AUTH_KEY, &marker)?;
        self.state = GateState::Unlocked;
        tracing::info!("tracker unlocked");
        Ok(true)
    }

    pub fn lock(&mut self) -> Result<()> {
        self.session.remove(AUTH_KEY)?;
        self.state = GateState::Locked;
        tracing::info!("tracker locked");
        Ok(())
    }

    pub fn require_unlocked(&self) -> Result<()> {
        match self.state {
            GateState::Unlocked => Ok(()),
            GateState::Locked => Err(CodeCartError::Locked),
        }
    }
}

/// The session a command runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    /// Start time of the session's process, when it can be determined.
    pub stamp: Option<String>,
}

impl Session {
    /// `CODECART_SESSION` when set (no stamp; the caller owns its lifetime),
    /// otherwise the parent process, normally the invoking shell.
    pub fn current() -> Self {
        if let Ok(id) = std::env::var(SESSION_ENV) {
            if !id.trim().is_empty() {
                return Self { id, stamp: None };
            }
        }
        parent_session()
    }
}

#[cfg(unix)]
fn parent_session() -> Session {
    let ppid = std::os::unix::process::parent_id();
    Session {
        id: format!("{}{}", PPID_PREFIX, ppid),
        stamp: process_start_stamp(ppid),
    }
}

#[cfg(not(unix))]
fn parent_session() -> Session {
    Session {
        id: "default".to_string(),
        stamp: None,
    }
}

/// Start time of `pid` in clock ticks since boot (field 22 of
/// `/proc/<pid>/stat`). `None` if the process does not exist.
#[cfg(target_os = "linux")]
pub fn process_start_stamp(pid: u32) -> Option<String> {
    let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
    // The command name may contain spaces and parentheses; fields after
    // the last ')' start at field 3.
    let rest = &stat[stat.rfind(')')? + 1..];
    rest.split_whitespace().nth(19).map(str::to_string)
}

#[cfg(not(target_os = "linux"))]
pub fn process_start_stamp(_pid: u32) -> Option<String> {
    None
}

pub fn session_dir(data_dir: &Path, session: &str) -> PathBuf {
    data_dir.join(SESSIONS_DIR).join(session)
}

/// Session store for `session` under the tracker data directory.
pub fn session_storage(data_dir: &Path, session: &str) -> Result<FileStorage> {
    FileStorage::open(session_dir(data_dir, session))
}

/// Remove `ppid-*` session directories whose process is gone or whose
/// marker was written by a different process. `keep` is never removed.
/// Returns how many directories were removed.
pub fn prune_stale_sessions(data_dir: &Path, keep: &str) -> Result<usize> {
    let sessions = data_dir.join(SESSIONS_DIR);
    if !sessions.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(&sessions)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name == keep {
            continue;
        }
        let Some(pid) = name
            .strip_prefix(PPID_PREFIX)
            .and_then(|p| p.parse::<u32>().ok())
        else {
            continue;
        };

        let store = FileStorage::open(entry.path())?;
        let live = match storage::load_stored::<AuthMarker, _>(&store, AUTH_KEY) {
            Some(marker) => marker.stamp.is_some() && marker.stamp == process_start_stamp(pid),
            None => false,
        };
        if !live {
            fs::remove_dir_all(entry.path())?;
            tracing::debug!(session = %name, "removed stale session");
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tempfile::TempDir;

    struct AlwaysNo;

    impl Verifier for AlwaysNo {
        fn verify(&self, _secret: &str) -> bool {
            false
        }
    }

    fn marker(stamp: Option<&str>) -> AuthMarker {
        AuthMarker {
            authenticated: true,
            stamp: stamp.map(str::to_string),
        }
    }

    #[test]
    fn test_new_session_starts_locked() {
        let gate = AccessGate::open(MemoryStorage::new(), None);
        assert_eq!(gate.state(), GateState::Locked);
        assert!(matches!(gate.require_unlocked(), Err(CodeCartError::Locked)));
    }

    #[test]
    fn test_marker_with_matching_stamp_starts_unlocked() {
        let session = MemoryStorage::new();
        storage::save(&session, AUTH_KEY, &marker(Some("4242"))).unwrap();

        let gate = AccessGate::open(session, Some("4242".to_string()));
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_marker_from_earlier_process_stays_locked() {
        let session = MemoryStorage::new();
        storage::save(&session, AUTH_KEY, &marker(Some("4242"))).unwrap();

        let gate = AccessGate::open(session, Some("9999".to_string()));
        assert_eq!(gate.state(), GateState::Locked);
    }

    #[test]
    fn test_stamped_marker_does_not_open_unstamped_session() {
        let session = MemoryStorage::new();
        storage::save(&session, AUTH_KEY, &marker(Some("4242"))).unwrap();

        let gate = AccessGate::open(session, None);
        assert_eq!(gate.state(), GateState::Locked);
    }

    #[test]
    fn test_bare_boolean_marker_stays_locked() {
        let session = MemoryStorage::new();
        storage::save(&session, AUTH_KEY, &true).unwrap();

        let gate = AccessGate::open(session, None);
        assert_eq!(gate.state(), GateState::Locked);
    }

    #[test]
    fn test_corrupt_marker_stays_locked() {
        let session = MemoryStorage::new();
        session.write(AUTH_KEY, "maybe").unwrap();

        let gate = AccessGate::open(session, None);
        assert_eq!(gate.state(), GateState::Locked);
    }

    #[test]
    fn test_wrong_secret_stays_locked() {
        let mut gate = AccessGate::open(MemoryStorage::new(), None);
        assert!(!gate.unlock("guess", &AlwaysNo).unwrap());
        assert_eq!(gate.state(), GateState::Locked);
    }

    #[test]
    fn test_unlock_and_lock() {
        let mut gate = AccessGate::open(MemoryStorage::new(), None);
        let verifier = PasscodeVerifier::new("open-sesame");

        assert!(gate.unlock("open-sesame", &verifier).unwrap());
        assert!(gate.require_unlocked().is_ok());

        gate.lock().unwrap();
        assert_eq!(gate.state(), GateState::Locked);
    }

    #[test]
    fn test_unlock_writes_current_stamp() {
        let session = MemoryStorage::new();
        let mut gate = AccessGate::open(session, Some("777".to_string()));
        gate.unlock("pw", &PasscodeVerifier::new("pw")).unwrap();

        let stored: AuthMarker = storage::load_stored(&gate.session, AUTH_KEY).unwrap();
        assert_eq!(stored, marker(Some("777")));
    }

    #[test]
    fn test_empty_passcode_rejects_everything() {
        let verifier = PasscodeVerifier::new("");
        assert!(!verifier.verify(""));
        assert!(!verifier.verify("anything"));
    }

    #[test]
    fn test_marker_is_per_session() {
        let tmp = TempDir::new().unwrap();
        let verifier = PasscodeVerifier::new("pw");

        let mut first = AccessGate::open(session_storage(tmp.path(), "one").unwrap(), None);
        first.unlock("pw", &verifier).unwrap();

        let again = AccessGate::open(session_storage(tmp.path(), "one").unwrap(), None);
        let other = AccessGate::open(session_storage(tmp.path(), "two").unwrap(), None);
        assert!(again.is_unlocked());
        assert!(!other.is_unlocked());
    }

    #[test]
    fn test_prune_removes_dead_ppid_sessions_only() {
        let tmp = TempDir::new().unwrap();

        let dead = session_storage(tmp.path(), "ppid-4294967295").unwrap();
        storage::save(&dead, AUTH_KEY, &marker(Some("bogus"))).unwrap();
        session_storage(tmp.path(), "ppid-4294967294").unwrap();
        let named = session_storage(tmp.path(), "integration").unwrap();
        storage::save(&named, AUTH_KEY, &marker(None)).unwrap();
        let current = session_storage(tmp.path(), "ppid-4294967293").unwrap();
        storage::save(&current, AUTH_KEY, &marker(Some("bogus"))).unwrap();

        let removed = prune_stale_sessions(tmp.path(), "ppid-4294967293").unwrap();

        assert_eq!(removed, 2);
        assert!(!session_dir(tmp.path(), "ppid-4294967295").exists());
        assert!(!session_dir(tmp.path(), "ppid-4294967294").exists());
        assert!(session_dir(tmp.path(), "integration").exists());
        assert!(session_dir(tmp.path(), "ppid-4294967293").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_prune_keeps_live_session() {
        let tmp = TempDir::new().unwrap();
        let pid = std::process::id();
        let name = format!("ppid-{}", pid);
        let live = session_storage(tmp.path(), &name).unwrap();
        let stamp = process_start_stamp(pid);
        assert!(stamp.is_some());
        storage::save(
            &live,
            AUTH_KEY,
            &AuthMarker {
                authenticated: true,
                stamp,
            },
        )
        .unwrap();

        let removed = prune_stale_sessions(tmp.path(), "ppid-1").unwrap();

        assert_eq!(removed, 0);
        assert!(session_dir(tmp.path(), &name).exists());
    }

    #[test]
    fn test_prune_without_sessions_dir() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(prune_stale_sessions(tmp.path(), "x").unwrap(), 0);
    }
}
