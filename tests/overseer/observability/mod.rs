mod concurrency;
mod status_gauges;
