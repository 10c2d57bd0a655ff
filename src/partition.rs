use crate::models::PanelRow;
use itertools::Itertools;

/// Sort rows by (country id, year) and split them into one year-ordered
/// partition per country. Partitions come out in country id order.
pub fn by_country<T: PanelRow>(mut rows: Vec<T>) -> Vec<Vec<T>> {
    rows.sort_by(|a, b| {
        a.country_id()
            .cmp(b.country_id())
            .then(a.year().cmp(&b.year()))
    });

    let mut partitions = Vec::new();
    let chunks = rows.into_iter().chunk_by(|r| r.country_id().to_string());
    for (_, group) in &chunks {
        partitions.push(group.collect::<Vec<T>>());
    }
    partitions
}
