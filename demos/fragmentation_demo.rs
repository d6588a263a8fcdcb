// Demonstration of fragmentation and coalescing in the buddy allocator
// Shows how buddy merging works when deallocating adjacent blocks

use chopsim::BuddyAllocator;

fn summary(allocator: &BuddyAllocator) -> String {
    format!(
        "{} blocks, {} free, largest free block {}",
        allocator.block_count(),
        allocator.free_size(),
        allocator
            .largest_free_block()
            .map_or_else(|| "none".to_string(), |size| size.to_string())
    )
}

fn main() {
    let allocator = BuddyAllocator::new(4096).expect("Failed to create allocator");

    println!("=== Buddy Allocator Fragmentation Demo ===\n");

    // Phase 1: Allocate many small blocks
    println!("Phase 1: Allocating 32 small blocks (64 units each)");
    let mut blocks = Vec::new();
    for i in 0..32 {
        match allocator.allocate(64) {
            Ok(start) => {
                blocks.push(start);
                if i % 8 == 7 {
                    println!("  Allocated blocks 0-{}", i);
                }
            }
            Err(e) => {
                println!("  Failed at block {}: {}", i, e);
                break;
            }
        }
    }
    println!("  Total allocated: {} blocks", blocks.len());
    println!("  {}\n", summary(&allocator));

    // Phase 2: Free every other block to create fragmentation
    println!("Phase 2: Freeing every other block (creating fragmentation)");
    let mut freed_count = 0;
    for &start in blocks.iter().skip(1).step_by(2) {
        allocator.deallocate(start).unwrap();
        freed_count += 1;
    }
    println!(
        "  Freed {} blocks, {} remain allocated",
        freed_count,
        blocks.len() - freed_count
    );
    println!("  {}\n", summary(&allocator));

    // Phase 3: The upper half of the space was never touched, so a large
    // block still fits there; the fragmented lower half cannot serve one
    println!("Phase 3: Allocating large blocks (1024 units)");
    let mut large = Vec::new();
    loop {
        match allocator.allocate(1024) {
            Ok(start) => {
                println!("  ✓ Allocated 1024 units at {}", start);
                large.push(start);
            }
            Err(e) => {
                println!("  ✗ Failed: {}", e);
                break;
            }
        }
    }
    println!("  Free units remain, but none form a 1024-unit buddy block\n");
    for start in large {
        allocator.deallocate(start).unwrap();
    }

    // Phase 4: Free remaining blocks to enable coalescing
    println!("Phase 4: Freeing remaining blocks (enabling coalescing)");
    for &start in blocks.iter().step_by(2) {
        allocator.deallocate(start).unwrap();
    }
    println!("  {}\n", summary(&allocator));

    // Phase 5: Demonstrate buddy merging cascade
    println!("Phase 5: Demonstrating buddy merging cascade");
    println!("  Allocating 4x 128-unit blocks...");
    let b1 = allocator.allocate(128).unwrap();
    let b2 = allocator.allocate(128).unwrap();
    let b3 = allocator.allocate(128).unwrap();
    let b4 = allocator.allocate(128).unwrap();
    println!("  Blocks at: {}, {}, {}, {}", b1, b2, b3, b4);

    println!("  Freeing in order: b2, b1 (should merge), then b4, b3 (should merge)");
    allocator.deallocate(b2).unwrap();
    allocator.deallocate(b1).unwrap();
    println!("    Freed b2, b1 -> {}", summary(&allocator));
    allocator.deallocate(b4).unwrap();
    allocator.deallocate(b3).unwrap();
    println!("    Freed b4, b3 -> {}", summary(&allocator));

    assert!(allocator.is_fully_free());
    println!("\n=== Demo completed successfully ===");
}
