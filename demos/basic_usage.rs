// Basic usage example of the chopsim buddy allocator
// Walks a 16-unit address space through allocation, splitting and coalescing

use chopsim::{BuddyAllocator, BuddyAllocatorError};

fn print_memory_map(allocator: &BuddyAllocator) {
    println!("Memory map:");
    for block in allocator.snapshot() {
        println!("  {}", block);
    }
}

fn main() {
    let allocator = match BuddyAllocator::new(16) {
        Ok(alloc) => {
            println!("✓ Allocator initialized with {} units", alloc.capacity());
            alloc
        }
        Err(e) => {
            eprintln!("✗ Failed to initialize allocator: {}", e);
            return;
        }
    };
    print_memory_map(&allocator);

    // Example 1: Rounding up to a power of two
    println!("\n--- Example 1: Allocate 3 units (rounded to 4) ---");
    let first = match allocator.allocate(3) {
        Ok(start) => {
            println!("✓ Allocated at address {}", start);
            start
        }
        Err(e) => {
            eprintln!("✗ Allocation failed: {}", e);
            return;
        }
    };
    print_memory_map(&allocator);

    // Example 2: Best fit picks the 4-unit block, not the 8-unit one
    println!("\n--- Example 2: Allocate 2 units ---");
    let second = match allocator.allocate(2) {
        Ok(start) => {
            println!("✓ Allocated at address {}", start);
            start
        }
        Err(e) => {
            eprintln!("✗ Allocation failed: {}", e);
            return;
        }
    };
    print_memory_map(&allocator);

    // Example 3: Freeing a block whose buddy has been split does not merge
    println!("\n--- Example 3: Deallocate the first block ---");
    match allocator.deallocate(first) {
        Ok(()) => println!("✓ Deallocated address {}", first),
        Err(e) => eprintln!("✗ Deallocation failed: {}", e),
    }
    print_memory_map(&allocator);

    // Example 4: Coalescing cascades all the way back up
    println!("\n--- Example 4: Deallocate the second block ---");
    match allocator.deallocate(second) {
        Ok(()) => println!("✓ Deallocated address {}", second),
        Err(e) => eprintln!("✗ Deallocation failed: {}", e),
    }
    print_memory_map(&allocator);

    // Example 5: Errors
    println!("\n--- Example 5: Error cases ---");
    match allocator.allocate(17) {
        Ok(_) => println!("✗ Unexpected success - should have failed!"),
        Err(e) => println!("✓ Expected failure: {}", e),
    }
    match allocator.deallocate(99) {
        Err(BuddyAllocatorError::InvalidAddress { .. }) => {
            println!("✓ Expected failure: address 99 is not a block")
        }
        other => println!("✗ Unexpected result: {:?}", other),
    }
    match allocator.deallocate(0) {
        Err(e @ BuddyAllocatorError::DoubleFree { .. }) => println!("✓ Expected failure: {}", e),
        other => println!("✗ Unexpected result: {:?}", other),
    }

    println!("\n--- All examples completed successfully ---");
}
