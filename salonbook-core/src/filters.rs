use crate::Service;

pub fn filter_by_status(services: &[Service], active: bool) -> Vec<Service> {
    services
        .iter()
        .filter(|s| s.status == active)
        .cloned()
        .collect()
}

/// Case-insensitive substring match on the title. A blank query matches everything.
pub fn search_by_title(services: &[Service], query: &str) -> Vec<Service> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return services.to_vec();
    }
    services
        .iter()
        .filter(|s| s.title.to_lowercase().contains(&q))
        .cloned()
        .collect()
}

/// Stable sort by lowercased title.
pub fn sort_by_title(services: &mut [Service]) {
    services.sort_by_cached_key(|s| s.title.to_lowercase());
}
