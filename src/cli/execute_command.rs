use crate::cli::{Cli, Commands};
use crate::storage_engine::{
    HashStatistics, PrimaryHashFile, Result, SecondaryHashFile, StoreError, statistics,
};
use bucket_store_layout::Record;
use tracing::debug;

/// Executes a parsed CLI command against the hash file named in `cli`.
///
/// Output goes to stdout. Any failure is printed to stderr and the process
/// exits with status 1.
///
/// # References
/// - [`Commands`](crate::cli::Commands): Defines the available CLI commands.
/// - [`PrimaryHashFile`](crate::storage_engine::PrimaryHashFile) and
///   [`SecondaryHashFile`](crate::storage_engine::SecondaryHashFile): The engines.
pub fn execute_command(cli: &Cli) {
    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    debug!("Running {:?} on {}", cli.command, cli.file.display());

    match &cli.command {
        Commands::Create { buckets } => {
            PrimaryHashFile::create(&cli.file, *buckets)?;
            println!(
                "Created primary hash file {:?} with {} buckets",
                cli.file, buckets
            );
        }

        Commands::Insert {
            id,
            name,
            surname,
            address,
        } => {
            let record = Record::new(*id, name.as_str(), surname.as_str(), address.as_str())
                .map_err(StoreError::InvalidRecord)?;
            let mut primary = PrimaryHashFile::open(&cli.file)?;
            let block = primary.insert(&record)?;
            primary.close()?;
            println!("Inserted record {} into block {}", id, block);
        }

        Commands::Delete { id } => {
            let mut primary = PrimaryHashFile::open(&cli.file)?;
            primary.delete(*id)?;
            primary.close()?;
            println!("Deleted record {}", id);
        }

        Commands::Scan { id } => {
            let mut primary = PrimaryHashFile::open(&cli.file)?;
            let outcome = primary.scan(*id)?;
            primary.close()?;

            for record in &outcome.records {
                println!("{}", record);
            }
            println!("{:-<50}", "");
            println!("{:<25} {}", "RECORDS:", outcome.records.len());
            println!("{:<25} {}", "BLOCKS VISITED:", outcome.blocks_visited);
        }

        Commands::Index { buckets, primary } => {
            let summary = SecondaryHashFile::create(&cli.file, *buckets, primary)?;
            println!(
                "Created secondary hash file {:?} with {} buckets",
                cli.file, buckets
            );
            println!(
                "Indexed {} surnames, skipped {} duplicates",
                summary.indexed, summary.skipped_duplicates
            );
        }

        Commands::IndexInsert {
            id,
            name,
            surname,
            address,
            primary,
        } => {
            let record = Record::new(*id, name.as_str(), surname.as_str(), address.as_str())
                .map_err(StoreError::InvalidRecord)?;
            let mut primary_file = PrimaryHashFile::open(primary)?;
            let mut index = SecondaryHashFile::open(&cli.file)?;

            let block = primary_file.insert(&record)?;
            index.insert_for(&record, block)?;

            index.close()?;
            primary_file.close()?;
            println!(
                "Inserted record {} into block {} and indexed surname '{}'",
                id, block, surname
            );
        }

        Commands::Lookup { surname, primary } => {
            let mut primary_file = PrimaryHashFile::open(primary)?;
            let mut index = SecondaryHashFile::open(&cli.file)?;

            let joined = index.lookup(surname, &mut primary_file)?;

            index.close()?;
            primary_file.close()?;
            println!("{}", joined.record);
            println!("{:-<50}", "");
            println!("{:<25} {}", "BLOCKS VISITED:", joined.blocks_visited);
        }

        Commands::Stats => {
            let stats = statistics(&cli.file)?;
            print_statistics(cli, &stats);
        }
    }

    Ok(())
}

fn print_statistics(cli: &Cli, stats: &HashStatistics) {
    println!("\n{:=^50}", " HASH FILE STATISTICS ");
    println!("{:<25} {:?}", "FILE:", cli.file);
    println!("{:<25} {}", "KIND:", stats.kind);
    println!("{:-<50}", ""); // Separator

    println!("{:<25} {}", "FILE BLOCKS:", stats.file_blocks);
    println!("{:<25} {}", "DIRECTORY BLOCKS:", stats.directory_blocks);
    println!("{:<25} {}", "DATA BLOCKS:", stats.data_blocks);
    println!("{:<25} {}", "BUCKETS:", stats.bucket_count);
    println!("{:<25} {}", "BUCKETS WITH DATA:", stats.buckets_with_data);
    println!("{:<25} {}", "TOTAL ELEMENTS:", stats.total_elements);
    println!(
        "{:<25} {}",
        "MIN ELEMENTS:",
        stats.min_elements.map_or("-".to_string(), |n| n.to_string())
    );
    println!(
        "{:<25} {}",
        "MAX ELEMENTS:",
        stats.max_elements.map_or("-".to_string(), |n| n.to_string())
    );
    println!("{:<25} {:.2}", "AVG (BUCKETS W/ DATA):", stats.average_elements);
    println!("{:<25} {:.2}", "AVG (ALL BUCKETS):", stats.average_over_all_buckets);
    println!("{:<25} {}", "OVERFLOW BLOCKS:", stats.total_overflow_blocks);

    println!("{:-<50}", ""); // Separator
    println!("{:<10} {:>12} {:>16}", "BUCKET", "ELEMENTS", "OVERFLOW BLOCKS");
    for (bucket, (elements, overflow)) in stats
        .elements_per_bucket
        .iter()
        .zip(&stats.overflow_blocks_per_bucket)
        .enumerate()
    {
        println!("{:<10} {:>12} {:>16}", bucket, elements, overflow);
    }
    println!("{:=<50}", ""); // Footer
}
