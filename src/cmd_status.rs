//! `vibey status`: today's quota usage.

use vibey_config::Config;

use crate::cmd_run::build_store;

pub(crate) async fn status(config: &Config) -> i32 {
    let store = build_store(&config.quota);
    let state = store.state().await;
    let today = store.today_count().await;

    println!(
        "Today's count: {}/{}",
        today, config.quota.max_comments_per_day
    );
    println!("Engaged posts recorded: {}", state.posts.len());
    println!("Last reset: {}", state.last_reset.to_rfc3339());
    println!("State file: {}", config.quota.state_file.display());
    0
}
