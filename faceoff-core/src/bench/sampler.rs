use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};

use super::report::CpuSnapshot;

/// Takes a point-in-time CPU/memory snapshot of `pid`.
///
/// Sampling is best-effort telemetry: a missing process or a failed
/// blocking task degrades to an all-zero snapshot instead of an error.
/// CPU is sysinfo's process CPU percentage (relative to one core, can
/// exceed 100 on multi-core hosts); memory is RSS in MiB.
pub async fn sample(pid: u32) -> CpuSnapshot {
    match tokio::task::spawn_blocking(move || sample_blocking(pid)).await {
        Ok(snapshot) => snapshot,
        Err(_) => CpuSnapshot::zero(),
    }
}

fn sample_blocking(pid: u32) -> CpuSnapshot {
    let pid = Pid::from_u32(pid);
    let refresh = RefreshKind::nothing().with_processes(ProcessRefreshKind::everything());
    let mut sys = System::new_with_specifics(refresh);

    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::everything(),
    );

    match sys.process(pid) {
        Some(p) => CpuSnapshot::new(
            f64::from(p.cpu_usage()),
            p.memory() as f64 / (1024.0 * 1024.0),
        ),
        None => CpuSnapshot::zero(),
    }
}
