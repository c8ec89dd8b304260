use crate::services::PredictionService;

pub async fn run(public_url: &str) {
    let result = async {
        let service = PredictionService::new(public_url)?;
        service.available_companies().await
    }
    .await;

    match result {
        Ok(companies) if companies.is_empty() => {
            println!("⚠️  Prediction file has no companies");
        }
        Ok(companies) => {
            println!("🏢 {} companies with predictions\n", companies.len());
            for company in companies {
                println!("   {}", company);
            }
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
