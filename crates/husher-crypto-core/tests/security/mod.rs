mod entropy_quality;
mod secret_hygiene;
mod tamper_detection;
