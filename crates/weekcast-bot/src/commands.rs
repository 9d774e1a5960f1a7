//! Command surface: each handler returns the reply text shown to the user.
//!
//! Validation failures echo the specific rule that was broken; storage
//! failures get a generic reply and a logged error. Neither aborts the
//! process.

use tracing::{error, info};
use weekcast_store::PostStore;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn add(store: &PostStore, content: &str, day_of_week: u8, hour: u8, minute: u8) -> String {
    info!(day_of_week, hour, minute, "creating weekly post");
    match store.create(content, day_of_week, hour, minute) {
        Ok(post) => format!(
            "Your weekly post was successfully created! (id {})",
            post.id
        ),
        Err(e) if e.is_validation() => e.to_string(),
        Err(e) => {
            error!("error creating weekly post: {e}");
            "There was an error saving your new post.".to_string()
        }
    }
}

pub fn list(store: &PostStore) -> String {
    match store.list() {
        Ok(posts) if posts.is_empty() => "No weekly posts scheduled.".to_string(),
        Ok(posts) => posts
            .iter()
            .map(|p| {
                format!(
                    "{:>4}  {} {:02}:{:02}  {}",
                    p.id, WEEKDAYS[p.day_of_week as usize], p.hour, p.minute, p.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Err(e) => {
            error!("error listing weekly posts: {e}");
            "There was an error loading the weekly posts.".to_string()
        }
    }
}

pub fn remove(store: &PostStore, id: i64) -> String {
    match store.delete(id) {
        Ok(()) => format!("Weekly post {id} removed."),
        Err(weekcast_store::StoreError::PostNotFound { id }) => {
            format!("No weekly post with id {id}.")
        }
        Err(e) => {
            error!("error removing weekly post: {e}");
            "There was an error removing the post.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn store() -> PostStore {
        PostStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn add_reports_success() {
        let store = store();
        let reply = add(&store, "hi", 2, 9, 30);
        assert!(reply.starts_with("Your weekly post was successfully created!"));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn add_surfaces_minute_validation() {
        let store = store();
        let reply = add(&store, "hi", 2, 9, 15);
        assert!(reply.contains("minute must be 0 or 30"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn remove_distinguishes_missing_ids() {
        let store = store();
        let post = store.create("hi", 2, 9, 30).unwrap();
        assert_eq!(remove(&store, post.id), format!("Weekly post {} removed.", post.id));
        assert_eq!(remove(&store, post.id), format!("No weekly post with id {}.", post.id));
    }

    #[test]
    fn list_formats_schedule() {
        let store = store();
        store.create("standup", 0, 9, 0).unwrap();
        let listing = list(&store);
        assert!(listing.contains("Monday 09:00  standup"));
    }
}
