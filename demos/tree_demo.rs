//! Replays a fixed insert/delete workload on each balancing discipline and prints
//! the in-order contents after every deletion.
//!
//! ```text
//! cargo run --example tree_demo              # all disciplines
//! cargo run --example tree_demo -- avl       # one discipline
//! RUST_LOG=ordtree=trace cargo run --example tree_demo -- red-black
//! ```

use ordtree::{Discipline, Order, OrderedCollection, OrderedTree, ParseDisciplineError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const INSERTS: [i32; 12] = [17, 18, 23, 34, 27, 15, 9, 6, 25, 13, 10, 37];
const DELETES: [i32; 11] = [18, 25, 15, 6, 13, 37, 27, 17, 34, 9, 10];

fn init_logger() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("valid default filter");

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .try_init();
}

fn render(tree: &OrderedTree<i32>) -> String {
    let keys: Vec<String> = tree.traverse(Order::InOrder).map(ToString::to_string).collect();
    format!("[{}]", keys.join(", "))
}

fn replay(discipline: Discipline) {
    let mut tree = OrderedTree::new(discipline);
    tree.extend(INSERTS);

    println!("== {discipline} ==");
    println!("inserted       {} (height {})", render(&tree), tree.height());
    for key in DELETES {
        tree.delete(&key);
        println!("deleted {key:>3}    {}", render(&tree));
    }
    println!();
}

fn main() -> Result<(), ParseDisciplineError> {
    init_logger();

    let disciplines = match std::env::args().nth(1) {
        Some(name) => vec![name.parse::<Discipline>()?],
        None => Discipline::ALL.to_vec(),
    };

    for discipline in disciplines {
        tracing::info!(%discipline, "replaying workload");
        replay(discipline);
    }
    Ok(())
}
