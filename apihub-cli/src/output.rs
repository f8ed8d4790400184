//! Plain-text rendering for terminal output. Each function returns the
//! full text including the trailing newline.

use apihub_core::{
    Country, Page, Quote, WeatherReport,
    usecase::health::{DetailedHealth, HealthStatus, Ping},
};

const HOURLY_PREVIEW: usize = 12;

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn ping(ping: &Ping) -> String {
    finish(vec![format!("{}: {}", ping.status, ping.message)])
}

pub fn health_status(status: &HealthStatus) -> String {
    let overall = format!("{:?}", status.status).to_lowercase();
    let mut lines = vec![
        format!("Status:  {overall}"),
        format!("Version: {}", status.version),
        format!("Uptime:  {:.0}s", status.uptime_seconds),
    ];

    for c in &status.components {
        let state = format!("{:?}", c.status).to_lowercase();
        let message = c.message.as_deref().unwrap_or("");
        lines.push(format!("  {:<10} {:<10} {message}", c.name, state));
    }

    finish(lines)
}

pub fn health_detailed(detailed: &DetailedHealth) -> String {
    let sys = &detailed.system_metrics;
    let proc = &detailed.process_metrics;
    let info = &detailed.system_info;

    let mut out = health_status(&detailed.health);
    let mut lines = vec![
        "System:".to_string(),
        format!("  CPU:     {:.1}% of {} cores", sys.cpu_percent, sys.cpu_count),
        format!("  Memory:  {:.1}% used, {:.2} GB available", sys.memory_percent, sys.memory_available_gb),
        format!("  Disk:    {:.1}% used, {:.2} GB free", sys.disk_usage_percent, sys.disk_free_gb),
        format!("  Network: {} B sent, {} B received", sys.network_bytes_sent, sys.network_bytes_recv),
        format!("Process {}:", proc.pid),
        format!("  Memory:  {:.1} MB resident, {:.1} MB virtual", proc.memory_rss_mb, proc.memory_vms_mb),
        format!("  CPU:     {:.1}%", proc.cpu_percent),
    ];
    if let Some(threads) = proc.num_threads {
        lines.push(format!("  Threads: {threads}"));
    }
    if let Some(files) = proc.open_files {
        lines.push(format!("  Files:   {files}"));
    }

    lines.push(format!("Host {}:", info.hostname.as_deref().unwrap_or("-")));
    lines.push(format!("  Platform: {}", info.platform));
    if let Some(boot) = info.boot_time {
        lines.push(format!("  Booted:   {}", boot.format("%Y-%m-%d %H:%M UTC")));
    }
    if let Some([one, five, fifteen]) = info.load_average {
        lines.push(format!("  Load:     {one:.2} {five:.2} {fifteen:.2}"));
    }

    out.push_str(&finish(lines));
    out
}

pub fn weather_report(report: &WeatherReport) -> String {
    let now = &report.current;
    let mut lines = vec![
        format!("{} ({})", report.location, report.timezone),
        format!("  {}", now.weather_description),
        format!("  Temperature: {:.1}°C", now.temperature),
        format!("  Humidity:    {}%", now.humidity),
        format!("  Wind:        {:.1} km/h from {}°", now.wind_speed, now.wind_direction),
    ];
    if let Some(pressure) = now.pressure {
        lines.push(format!("  Pressure:    {pressure:.0} hPa"));
    }

    if let Some(hourly) = report.hourly.as_deref().filter(|h| !h.is_empty()) {
        lines.push(String::new());
        lines.push(format!("Next {} hours:", hourly.len().min(HOURLY_PREVIEW)));
        for h in hourly.iter().take(HOURLY_PREVIEW) {
            let rain = h.precipitation_probability.map(|p| format!(" rain {p}%")).unwrap_or_default();
            lines.push(format!(
                "  {}  {:>5.1}°C  {}{rain}",
                h.time.format("%a %H:%M"),
                h.temperature,
                h.weather_description
            ));
        }
    }

    if let Some(daily) = report.daily.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push("Daily:".to_string());
        for d in daily {
            lines.push(format!(
                "  {}  {:>5.1}° / {:>5.1}°  {}",
                d.date.format("%a %Y-%m-%d"),
                d.temperature_min,
                d.temperature_max,
                d.weather_description
            ));
        }
    }

    finish(lines)
}

fn quote_lines(quote: &Quote) -> Vec<String> {
    let mut lines = vec![format!("\"{}\"", quote.content), format!("  - {}", quote.author)];
    if !quote.tags.is_empty() {
        lines.push(format!("  [{}]  id: {}", quote.tags.join(", "), quote.id));
    } else {
        lines.push(format!("  id: {}", quote.id));
    }
    lines
}

pub fn quote(quote: &Quote) -> String {
    finish(quote_lines(quote))
}

pub fn quote_page(page: &Page<Quote>) -> String {
    let total = page.total_count.map(|t| t.to_string()).unwrap_or_else(|| "?".to_string());
    let mut lines = vec![format!("Page {} ({} of {total} quotes)", page.page, page.count)];

    for q in &page.items {
        lines.push(String::new());
        lines.extend(quote_lines(q));
    }

    finish(lines)
}

pub fn country(country: &Country) -> String {
    let mut lines = vec![
        format!("{} {}", country.flag, country.name).trim().to_string(),
        format!("  Official:   {}", country.official_name),
        format!("  Codes:      {} / {}", country.cca2, country.cca3),
        format!("  Capital:    {}", join_or_dash(&country.capital)),
    ];

    let region = match &country.subregion {
        Some(sub) => format!("{} ({sub})", country.region),
        None => country.region.clone(),
    };
    lines.push(format!("  Region:     {region}"));
    lines.push(format!("  Population: {}", country.population));

    if let Some(area) = country.area {
        lines.push(format!("  Area:       {area} km²"));
    }
    if let Some(currencies) = &country.currencies {
        let names: Vec<String> =
            currencies.iter().map(|c| format!("{} ({})", c.name, c.code)).collect();
        lines.push(format!("  Currencies: {}", names.join(", ")));
    }
    if let Some(languages) = &country.languages {
        let names: Vec<&str> = languages.iter().map(|l| l.name.as_str()).collect();
        lines.push(format!("  Languages:  {}", names.join(", ")));
    }
    if let Some(codes) = &country.calling_codes {
        lines.push(format!("  Calling:    {}", join_or_dash(codes)));
    }

    finish(lines)
}

pub fn country_list(countries: &[Country]) -> String {
    let mut lines: Vec<String> = countries
        .iter()
        .map(|c| format!("{:<4} {:<40} {}", c.cca3, c.name, c.region))
        .collect();
    lines.push(format!("{} countries", countries.len()));
    finish(lines)
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() { "-".to_string() } else { values.join(", ") }
}
