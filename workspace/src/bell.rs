use std::collections::BTreeMap;
use itertools::Itertools;
use rand::{ rngs::StdRng, Rng, SeedableRng };
use tracing::{ info, Level };
use qreg_sim::{ gate, BackendKind, ClassicalRegister, QuantumRegister };

const SHOTS: usize = 1000;

fn init_logging() {
    let level: Level
        = std::env::var("QSY_LOG").ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn bell(kind: BackendKind, seed: u64) -> qreg_sim::Result<QuantumRegister> {
    let mut q = QuantumRegister::with_seed(2, Some("q"), kind, seed)?;
    q.apply_gate(&gate::H, &[0], false)?;
    q.apply_gate(&gate::CX, &[0, 1], false)?;
    Ok(q)
}

fn main() -> qreg_sim::Result<()> {
    init_logging();
    let kind: BackendKind
        = std::env::args().nth(1)
        .map(|s| s.parse::<BackendKind>())
        .transpose()?
        .unwrap_or_default();

    let q = bell(kind, 10546)?;
    println!("{}", q);
    match q.to_dirac().as_str() {
        "" => println!("(state not available from the {} back-end)", kind),
        dirac => println!("{}", dirac),
    }

    let mut rng = StdRng::seed_from_u64(10546);
    let mut c = ClassicalRegister::new(2, Some("c"))?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..SHOTS {
        let mut q = bell(kind, rng.gen())?;
        c.set_state(&q.measure_all()?)?;
        let key: String = c.state().iter().join("");
        *counts.entry(key).or_default() += 1;
    }
    info!(shots = SHOTS, backend = %kind, "sampled");
    for (outcome, count) in counts.iter() {
        println!("{}: {:>5} ({:.3})", outcome, count, *count as f64 / SHOTS as f64);
    }
    println!("{}", c);
    Ok(())
}
