use crate::services::PredictionService;

pub async fn run(public_url: &str, company: String, days: usize) {
    let result = async {
        let service = PredictionService::new(public_url)?;
        service.get_stock_prediction(&company, days).await
    }
    .await;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let prediction = &report.prediction;
    println!("🔮 {} ({}, {} days)", report.company_name, report.model_type, days);
    println!("   Current price:   {:.2}", prediction.current_price);
    println!("   Predicted price: {:.2}", prediction.predicted_price);
    println!("   Change:          {:+.2}%", report.price_change_percent);
    println!("   Confidence:      {}%", prediction.confidence_level);
    println!("   Last updated:    {}", prediction.last_updated);

    for (date, price) in prediction.prediction_dates.iter().zip(&prediction.predicted_prices) {
        println!("   {}  {:.2}", date, price);
    }
}
