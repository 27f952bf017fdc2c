//! Per-marker label rows keyed by marker name
//!
//! Builds a keyed store of marker-to-marker links, inverts it with a
//! transpose, restricts it to a subset of markers, and persists the result.

use rowstore::{IndexedEntry, KeyedRowStore, Unbuilt};

fn main() -> Result<(), rowstore::Error> {
    let names = ["hip", "knee", "ankle", "toe"];

    let mut links = KeyedRowStore::<String, IndexedEntry<f32>, Unbuilt>::new();
    for (row, name) in names.iter().enumerate() {
        let next = row as i32 + 1;
        if (next as usize) < names.len() {
            let link = IndexedEntry::new(next, 0.5 * next as f32);
            links.add_fixed_row(name.to_string(), &[link]);
        } else {
            links.add_fixed_row(name.to_string(), &[]);
        }
    }
    let links = links.build_index()?;

    let parents = links.rows().transpose(links.row_count())?;
    for (row, name) in names.iter().enumerate() {
        let from: Vec<&str> = parents
            .row(row)
            .iter()
            .filter_map(|entry| links.key_of(entry.index as usize))
            .map(String::as_str)
            .collect();
        println!("{name}: linked from {from:?}");
    }

    let wanted = ["knee", "toe", "ankle"].map(String::from);
    let lower = links.subset_and_remap(&wanted);
    println!(
        "subset keys {:?}, {} links kept",
        lower.keys(),
        lower.element_count()
    );

    let mut bytes = Vec::new();
    lower.save(&mut bytes)?;
    let reloaded = KeyedRowStore::<String, IndexedEntry<f32>>::load(&mut bytes.as_slice())?;
    println!(
        "reloaded {} bytes, same content: {}, same version: {}",
        bytes.len(),
        reloaded.deep_eq(&lower),
        reloaded == lower
    );

    Ok(())
}
