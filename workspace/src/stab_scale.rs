use std::time::Instant;
use itertools::Itertools;
use tracing::{ info, Level };
use qreg_sim::{ gate, BackendKind, QuantumRegister };

const N: usize = 500;

fn init_logging() {
    let level: Level
        = std::env::var("QSY_LOG").ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn main() -> qreg_sim::Result<()> {
    init_logging();
    let t0 = Instant::now();
    let mut q = QuantumRegister::new(N, Some("ghz"), BackendKind::Stabilizer)?;
    q.apply_gate(&gate::H, &[0], false)?;
    for k in 1..N {
        q.apply_gate(&gate::CX, &[0, k], false)?;
    }
    // alternate signs without changing Z-basis statistics
    for k in (0..N).step_by(2) {
        q.apply_gate(&gate::Z, &[k], false)?;
    }
    let outcomes = q.measure_all()?;
    info!(qubits = N, elapsed = ?t0.elapsed(), "done");
    println!("{}", q);
    println!("{}", outcomes.iter().join(""));
    Ok(())
}
