use clap::Parser;
use micro_hash::HashTable;
use micro_hash::TableConfig;
use micro_hash::hash_fns::HashFunction;
use micro_hash::hash_fns::int32_rob;
use micro_hash::hash_fns::int32_wang;
use micro_hash::hash_fns::int32_wang2;
use micro_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    /// Number of values inserted
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u32,

    /// Percentage of the inserted values removed again, leaving tombstones
    #[arg(short = 'r', long = "remove_percent", default_value_t = 25)]
    remove_percent: u32,

    /// Maximum load factor of the table
    #[arg(short = 'l', long = "load_factor", default_value_t = 0.7)]
    load_factor: f64,

    /// 32-bit hash used to place values
    #[arg(long = "hash", default_value = "int32_wang")]
    hash: HashFunction,
}

fn main() {
    let args = Args::parse();

    let hash: fn(u32) -> u32 = match args.hash {
        HashFunction::Int32Wang => int32_wang,
        HashFunction::Int32Wang2 => int32_wang2,
        HashFunction::Int32Rob => int32_rob,
        other => {
            eprintln!("{other} does not take a u32 key");
            std::process::exit(2);
        }
    };
    let hash_u32 = |value: &u32| hash(*value) as u64;

    let config = match TableConfig::new(16, args.load_factor) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    println!(
        "Filling HashTable with {} values hashed by {} (max load factor {})",
        args.count, args.hash, args.load_factor
    );

    let mut table: HashTable<u32> = HashTable::with_config(config);
    for value in 0..args.count {
        match table.entry(hash_u32(&value), |&v| v == value, hash_u32) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }
    }

    println!("Inserted {} values into table", table.len());
    table.probe_histogram(hash_u32).print();
    table.debug_stats().print();

    let removals = (args.count as u64 * args.remove_percent.min(100) as u64 / 100) as u32;
    // Remove every other value so tombstones sit inside probe chains.
    let mut removed = 0;
    for value in (0..args.count).step_by(2).take(removals as usize) {
        if table.remove(hash_u32(&value), |&v| v == value).is_some() {
            removed += 1;
        }
    }

    println!();
    println!("Removed {removed} values");
    table.probe_histogram(hash_u32).print();
    table.debug_stats().print();
}
