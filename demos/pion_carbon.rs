use nalgebra::Vector3;
use nucascade::{
    simulate_events, Fate, FateTable, FermiGas, Hadron, IsotropicAngles, Nucleus, Outcome,
    Species, TransportConfig,
};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let manifest = env!("CARGO_MANIFEST_DIR");
    let fractions = FateTable::from_json_file(format!("{}/data/fate_fractions.json", manifest))
        .expect("fate table should load");
    let config = TransportConfig::default();
    let fermi = FermiGas::from_config(&config);
    let carbon = Nucleus::new(12, 6).expect("valid nucleus");
    let pion = Hadron::with_kinetic_energy(Species::PiPlus, 0.3, &Vector3::z(), [0.0; 4]);

    let start = Instant::now();
    let events = simulate_events(
        carbon,
        &config,
        &fractions,
        &IsotropicAngles,
        &fermi,
        &pion,
        12345,
        10_000,
    );
    let elapsed = start.elapsed();

    let mut fates: BTreeMap<String, usize> = BTreeMap::new();
    let mut escaped = 0;
    let mut absorbed = 0;
    let mut remnant_a = 0.0;
    let mut multiplicity = 0.0;
    for event in &events {
        if let Some((fate, outcome)) = event.steps.first() {
            let name = if *outcome == Outcome::Interacted {
                fate.to_string()
            } else {
                escaped += 1;
                format!("{} (escaped)", fate)
            };
            *fates.entry(name).or_insert(0) += 1;
            if *fate == Fate::Absorption {
                absorbed += 1;
            }
        }
        remnant_a += event.remnant.a() as f64;
        multiplicity += event.record.final_state().count() as f64;
    }

    let n = events.len() as f64;
    println!("{} events of 300 MeV pi+ on C12 in {:.2?}", events.len(), elapsed);
    for (fate, count) in &fates {
        println!("  {:<28} {:>6}  ({:.1}%)", fate, count, 100.0 * *count as f64 / n);
    }
    println!("  escaped after failures: {}", escaped);
    println!("  mean final-state multiplicity: {:.2}", multiplicity / n);
    println!("  mean remnant A: {:.2}", remnant_a / n);
    println!("  absorption share: {:.1}%", 100.0 * absorbed as f64 / n);
}
