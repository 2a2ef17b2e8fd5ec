use lattice_dem::*;

fn main() -> Result<()> {
    // Two free particles stretched 5% past tangency.
    let record = MeshRecord {
        coordinates: vec![[0.0, 0.0], [2.1, 0.0]],
        connect: vec![vec![1, 2], vec![1, 1]],
        forces: vec![0.0; 4].into(),
        restrictions: vec![0.0; 4].into(),
    };
    let config = RunConfig::default()
        .with_steps(2000)
        .with_time_step(1.0e-3)
        .with_mass(1.0)
        .with_stiffness(1.0)
        .with_monitor(MonitorPolicy::Fixed(0));

    let mut simulation = Simulation::new(load(&record)?, config)?;
    while simulation.current_step() < simulation.config().steps {
        let u = simulation.step()?;
        if simulation.current_step() % 200 == 0 {
            println!("t = {:.3}: u0 = {:+.5}", simulation.time(), u);
        }
    }
    println!(
        "expected period: {:.4}",
        2.0 * std::f64::consts::PI / 2.0_f64.sqrt()
    );
    Ok(())
}
