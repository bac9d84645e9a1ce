use std::path::Path;
use std::sync::Arc;

use checkup_planner::advisor::{CheckupAdvisor, CheckupQuery, Gender};
use checkup_planner::client::GeminiClient;
use checkup_planner::store::FileStore;
use checkup_planner::tasks::TaskStore;
use checkup_planner::Planner;

const STORAGE_FILE: &str = "checkup-planner.json";

#[tokio::main]
async fn main() {
    env_logger::init();

    let storage_path = Path::new(STORAGE_FILE);
    let storage = match FileStore::from_file(storage_path) {
        Ok(store) => store,
        Err(err) => {
            log::warn!("Invalid storage file: {}. Using an empty storage", err);
            FileStore::new(storage_path)
        }
    };

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    let advisor = CheckupAdvisor::new(Arc::new(GeminiClient::with_api_key(api_key)));

    let mut planner = Planner::new(TaskStore::new(storage), advisor);
    planner.start().await;

    let today = chrono::Utc::now().date_naive();
    if let Err(err) = planner.save_note(today, "Drink more water").await {
        log::error!("Unable to save today's note: {}", err);
    }

    println!("---- marked dates ----");
    for (date, marker) in planner.markers() {
        println!("  {}\t{}", date, marker.indicator_color);
    }

    let query = CheckupQuery{
        age: "40".to_string(),
        gender: Some(Gender::Female),
        condition: "hypothyroidism".to_string(),
    };
    planner.generate(&query).await;

    let state = planner.checkup_state();
    println!("---- points to be done ({:?}) ----", state.phase);
    for point in &state.suggestions {
        println!("- {}", point);
    }
}
