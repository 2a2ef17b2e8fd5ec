use lattice_dem::*;

fn main() -> Result<()> {
    let columns = 20;
    let rows = 4;
    let tip = columns * rows - 1;

    let record = LatticeBuilder::new(columns, rows, 2.0)
        .fix_column(0)
        .load_particle(tip, DVec2::new(0.0, -1.0e6))
        .build()?;

    let config = RunConfig::default().with_monitor(MonitorPolicy::FirstLoaded);
    let series = simulate(&record, ConnectivityPolicy::Reject, config)?;

    println!("Monitored DOF {} over {} steps", series.dof, series.len());
    for (i, u) in series.values.iter().enumerate().step_by(60) {
        println!("step {:>4}: {:+.6e}", i + 1, u);
    }
    Ok(())
}
