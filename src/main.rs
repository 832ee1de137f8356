//! Fills a bag with a mix of fixed and random keys, then dumps its shape.

use radix_bag::RadixBag;
use rand::{distr::Alphanumeric, Rng, SeedableRng};

fn main() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(rand::random());
    let mut bag = RadixBag::new();

    for word in ["tester", "water", "slow", "slower", "test", "team", "toast"] {
        bag.insert(word.as_bytes());
    }
    for _ in 0..12 {
        let len = rng.random_range(3..9);
        let key = (&mut rng)
            .sample_iter(Alphanumeric)
            .take(len)
            .collect::<Vec<u8>>();
        bag.insert(&key);
    }

    bag.print();
    println!("{} keys held in {} bytes", bag.len(), bag.heap_bytes());
}
