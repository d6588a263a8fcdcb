// Simulated process workload on top of chopsim
// Processes request odd-sized segments from a space whose size is not a power of two

use chopsim::{BuddyAllocator, BuddyConfig};

struct Process {
    pid: u32,
    segment: usize,
    units: usize,
}

fn print_memory_map(allocator: &BuddyAllocator) {
    for block in allocator.snapshot() {
        println!("    {}", block);
    }
}

fn main() {
    println!("=== Process Memory Simulation ===\n");

    let config = BuddyConfig::new(1000).with_min_block_size(16);
    let allocator = BuddyAllocator::with_config(config).expect("Failed to initialize allocator");

    println!("System Info:");
    println!("  Requested size: {} units", allocator.requested_size());
    println!("  Capacity: {} units (max order {})", allocator.capacity(), allocator.max_order());
    println!("  Minimum block: {} units\n", allocator.min_block_size());

    // Phase 1: Start processes
    println!("--- Starting Processes ---");
    let demands = [100, 30, 250, 5, 64, 120];
    let mut processes = Vec::new();
    for (pid, &units) in (1..).zip(demands.iter()) {
        match allocator.allocate(units) {
            Ok(segment) => {
                let block = allocator.lookup(segment).expect("allocated block is tracked");
                println!(
                    "  ✓ P{} asked for {} units, got {} at {}",
                    pid, units, block.size, segment
                );
                processes.push(Process {
                    pid,
                    segment,
                    units,
                });
            }
            Err(e) => eprintln!("  ✗ P{} could not start: {}", pid, e),
        }
    }
    println!(
        "  In use: {} units, free: {} units",
        allocator.allocated_size(),
        allocator.free_size()
    );
    print_memory_map(&allocator);

    // Phase 2: A large process that does not fit until others exit
    println!("\n--- Large Process ---");
    let large = 400;
    if let Err(e) = allocator.allocate(large) {
        println!("  ✗ P{} must wait: {}", processes.len() + 1, e);
    }

    println!("  Terminating processes with even pids...");
    processes.retain(|process| {
        if process.pid % 2 == 0 {
            allocator
                .deallocate(process.segment)
                .expect("running process owns its segment");
            println!("    P{} exited, released {} units", process.pid, process.units);
            false
        } else {
            true
        }
    });

    match allocator.allocate(large) {
        Ok(segment) => {
            println!("  ✓ Large process started at {}", segment);
            processes.push(Process {
                pid: 99,
                segment,
                units: large,
            });
        }
        Err(e) => println!("  ✗ Still waiting: {}", e),
    }
    print_memory_map(&allocator);

    // Phase 3: Shutdown
    println!("\n--- System Shutdown ---");
    for process in &processes {
        allocator.deallocate(process.segment).unwrap();
        println!("  P{} terminated", process.pid);
    }

    assert!(allocator.is_fully_free());
    println!("\n✓ All segments freed - address space whole again");
    print_memory_map(&allocator);
    println!("=== Simulation completed successfully ===");
}
