//! Process group isolation for spawned shells
//!
//! A recipe command runs as `sh -c "wget ..."`, so interrupting robofetch
//! must reach the grandchild too. These tests verify that:
//! 1. Shells spawned with in_new_process_group() lead their own group
//! 2. Terminating the registry kills the whole tree, not just the shell

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use nix::unistd::{getpgid, Pid};
use robofetch::process_guard::{ChildRegistry, CommandProcessGroup};

fn is_process_alive(pid: i32) -> bool {
    if nix::sys::signal::kill(Pid::from_raw(pid), None).is_err() {
        return false;
    }
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => !matches!(stat.split_whitespace().nth(2), Some("Z" | "X")),
        Err(_) => false,
    }
}

fn wait_for_death(pid: i32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !is_process_alive(pid) {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn test_shell_leads_its_own_group() {
    let mut child = Command::new("sh")
        .args(["-c", "sleep 30"])
        .stdout(Stdio::null())
        .in_new_process_group()
        .spawn()
        .expect("Failed to spawn sh");

    let pid = Pid::from_raw(child.id() as i32);
    let pgid = getpgid(Some(pid)).expect("getpgid");
    assert_eq!(pgid, pid);
    assert_ne!(pgid, getpgid(None).expect("own pgid"));

    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn test_registry_kills_grandchildren() {
    // The shell prints the PID of its background sleep, then waits on it
    let mut child = Command::new("sh")
        .args(["-c", "sleep 30 & echo $!; wait"])
        .stdout(Stdio::piped())
        .in_new_process_group()
        .spawn()
        .expect("Failed to spawn sh");

    let mut line = String::new();
    {
        use std::io::BufRead;
        let stdout = child.stdout.as_mut().expect("piped stdout");
        std::io::BufReader::new(stdout)
            .read_line(&mut line)
            .expect("read grandchild pid");
    }
    let grandchild: i32 = line.trim().parse().expect("numeric pid");
    assert!(is_process_alive(grandchild));

    let mut registry = ChildRegistry::default();
    registry.register(child.id());
    registry.terminate_all(Duration::from_secs(2));

    let _ = child.wait();
    assert!(
        wait_for_death(grandchild, Duration::from_secs(3)),
        "background sleep should die with its group"
    );
}
