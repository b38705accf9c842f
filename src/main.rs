//! Pickup-delivery routing solver - command line interface.
//!
//! Runs the ACO routing stage, the cargo simulator, and the GA
//! protection-purchase stage in sequence over a JSON routing instance.

use clap::{Parser, Subcommand};
use pd_robbery_solver::benchmark::{self, BenchmarkConfig};
use pd_robbery_solver::cargo_sim::{base_revenue, simulate};
use pd_robbery_solver::graph::ShortestPaths;
use pd_robbery_solver::heuristics::{AcoConfig, AntColonyOptimizer, GaConfig, GeneticOptimizer};
use pd_robbery_solver::instance::RouteInstance;
use pd_robbery_solver::report::RunReport;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "pd-robbery-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "ACO routing and GA robbery-protection solver for pickup-delivery parcels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one routing instance: run ACO, then the GA, print a summary.
    Solve {
        #[arg(short, long)]
        instance: PathBuf,

        #[arg(long, default_value = "200")]
        iterations: usize,
        #[arg(long, default_value = "20")]
        ants: usize,
        #[arg(long, default_value = "1.0")]
        alpha: f64,
        #[arg(long, default_value = "2.5")]
        beta: f64,
        #[arg(long, default_value = "0.1")]
        rho: f64,

        #[arg(long, default_value = "50")]
        population: usize,
        #[arg(long, default_value = "200")]
        generations: usize,
        #[arg(long, default_value = "0.05")]
        mutation_rate: f64,

        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write the full run report as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the pipeline over every instance in a directory, several
    /// times each, and print aggregate statistics.
    Bench {
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(short, long, default_value = "5")]
        runs: usize,

        #[arg(long, default_value = "100")]
        iterations: usize,
        #[arg(long, default_value = "20")]
        ants: usize,
        #[arg(long, default_value = "1.0")]
        alpha: f64,
        #[arg(long, default_value = "2.5")]
        beta: f64,
        #[arg(long, default_value = "0.1")]
        rho: f64,

        #[arg(long, default_value = "50")]
        population: usize,
        #[arg(long, default_value = "100")]
        generations: usize,
        #[arg(long, default_value = "0.05")]
        mutation_rate: f64,

        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write aggregate statistics to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            iterations,
            ants,
            alpha,
            beta,
            rho,
            population,
            generations,
            mutation_rate,
            seed,
            output,
            verbose,
        } => solve(
            &instance,
            AcoConfig { iterations, ants, alpha, beta, rho, seed },
            GaConfig { population, generations, mutation_rate, seed },
            output,
            verbose,
        ),

        Commands::Bench { dir, runs, iterations, ants, alpha, beta, rho, population, generations, mutation_rate, seed, output } => {
            run_bench(
                &dir,
                BenchmarkConfig {
                    runs,
                    aco: AcoConfig { iterations, ants, alpha, beta, rho, seed },
                    ga: GaConfig { population, generations, mutation_rate, seed },
                },
                output,
            )
        }
    }
}

fn solve(path: &PathBuf, aco_config: AcoConfig, ga_config: GaConfig, output: Option<PathBuf>, verbose: bool) {
    println!("Loading instance from {path:?}...");

    let instance = match RouteInstance::from_file(path) {
        Ok(inst) => inst,
        Err(e) => {
            eprintln!("Error loading instance: {e}");
            std::process::exit(1);
        }
    };

    let edges = instance.edge_table();
    let shortest = ShortestPaths::build(&edges);

    let aco_start = Instant::now();
    let mut aco = match AntColonyOptimizer::new(&shortest, &instance.parcels, instance.base, aco_config) {
        Ok(aco) => aco,
        Err(e) => {
            eprintln!("Invalid ACO configuration: {e}");
            std::process::exit(1);
        }
    };
    let aco_out = aco.solve();
    let aco_seconds = aco_start.elapsed().as_secs_f64();
    log::info!("ACO best distance: {:.2} over {} iterations", aco_out.best_distance, aco_config.iterations);

    if aco_out.best_distance >= pd_robbery_solver::types::UNREACHABLE {
        log::warn!(
            "instance {} looks disconnected for base {}: best tour includes a sentinel-sized segment",
            instance.name,
            instance.base
        );
    }

    let route_data = instance.route_data(&aco_out.best_tour);
    let cargo_steps = simulate(&route_data, &instance.parcels, Some(&aco_out.parcel_order));
    let revenue = base_revenue(&cargo_steps, &instance.parcels);

    let ga_start = Instant::now();
    let mut ga = match GeneticOptimizer::new(&route_data, &instance.parcels, ga_config) {
        Ok(ga) => ga,
        Err(e) => {
            eprintln!("Invalid GA configuration: {e}");
            std::process::exit(1);
        }
    };
    let ga_out = ga.run();
    let ga_seconds = ga_start.elapsed().as_secs_f64();
    log::info!("GA best fitness: {:.2} over {} generations", ga_out.history.last().copied().unwrap_or(revenue), ga_config.generations);

    if verbose {
        println!("Instance: {} (N={}, base={})", instance.name, instance.n, instance.base);
        println!("Parcel order: {:?}", aco_out.parcel_order);
        println!("Tour: {:?}", aco_out.best_tour);
    }

    println!("Best distance: {:.2}", aco_out.best_distance);
    println!("Base revenue (no robbery, no protection): {:.2}", revenue);
    println!("Protect bits: {:?}", ga_out.protect_bits);
    println!("Best net profit: {:.2}", ga_out.history.last().copied().unwrap_or(revenue));

    if let Some(out_path) = output {
        let report = RunReport::new(
            &instance.name,
            chrono::Utc::now(),
            &aco_out,
            cargo_steps,
            revenue,
            &ga_out,
            aco_seconds,
            ga_seconds,
        );
        match report.to_json_pretty() {
            Ok(json) => {
                if let Err(e) = std::fs::write(&out_path, json) {
                    eprintln!("Failed to write report to {out_path:?}: {e}");
                    std::process::exit(1);
                }
                println!("Wrote report to {out_path:?}");
            }
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn run_bench(dir: &PathBuf, config: BenchmarkConfig, output: Option<PathBuf>) {
    let stats = match benchmark::run_directory(dir, &config) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("Benchmark failed: {e}");
            std::process::exit(1);
        }
    };

    for s in &stats {
        println!(
            "{:<20} runs={:<3} avg_dist={:>10.2} best_dist={:>10.2} avg_fit={:>10.2} best_fit={:>10.2}",
            s.instance, s.runs, s.avg_distance, s.best_distance, s.avg_fitness, s.best_fitness
        );
    }

    if let Some(path) = output {
        if let Err(e) = benchmark::write_csv(&path, &stats) {
            eprintln!("Failed to write CSV to {path:?}: {e}");
            std::process::exit(1);
        }
        println!("Wrote statistics to {path:?}");
    }
}
