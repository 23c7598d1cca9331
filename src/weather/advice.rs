use super::WeatherReport;

/// Map an OpenWeather `weather.main` value to the three conditions the
/// client renders.
pub fn map_condition(weather_main: &str) -> &'static str {
    let main = weather_main.to_lowercase();

    if ["clear", "sun"].iter().any(|x| main.contains(x)) {
        "sunny"
    } else if ["cloud", "fog", "mist", "haze"].iter().any(|x| main.contains(x)) {
        "cloudy"
    } else if ["rain", "drizzle", "shower", "thunder", "storm"]
        .iter()
        .any(|x| main.contains(x))
    {
        "rainy"
    } else {
        "cloudy"
    }
}

/// Field-work advice keyed on the raw OpenWeather condition.
pub fn farming_advice(weather_main: &str) -> &'static str {
    let main = weather_main.to_lowercase();

    if ["clear", "sun"].iter().any(|x| main.contains(x)) {
        "Cocok untuk panen atau pengeringan hasil panen"
    } else if ["cloud", "fog", "mist", "haze"].iter().any(|x| main.contains(x)) {
        "Baik untuk menanam bibit atau penyemprotan pestisida"
    } else if ["rain", "drizzle", "shower"].iter().any(|x| main.contains(x)) {
        "Hindari pemupukan dan penyemprotan pestisida"
    } else if ["thunder", "storm"].iter().any(|x| main.contains(x)) {
        "Pastikan drainase lahan baik untuk mencegah genangan"
    } else {
        "Pantau kondisi tanaman secara berkala"
    }
}

/// Fixed payload served for `mock=true` and on upstream failure.
pub fn mock_report() -> WeatherReport {
    WeatherReport {
        temperature: 30.0,
        condition: "sunny".to_string(),
        description: "Cerah".to_string(),
        location: "Jakarta".to_string(),
        advice: "Cocok untuk panen atau pengeringan hasil panen".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_mapping_covers_openweather_taxonomy() {
        assert_eq!(map_condition("Clear"), "sunny");
        assert_eq!(map_condition("Clouds"), "cloudy");
        assert_eq!(map_condition("Mist"), "cloudy");
        assert_eq!(map_condition("Rain"), "rainy");
        assert_eq!(map_condition("Thunderstorm"), "rainy");
        // Unknown conditions default to cloudy
        assert_eq!(map_condition("Tornado"), "cloudy");
    }

    #[test]
    fn storm_advice_differs_from_rain_advice() {
        assert_ne!(farming_advice("Thunderstorm"), farming_advice("Rain"));
        assert_eq!(
            farming_advice("Thunderstorm"),
            "Pastikan drainase lahan baik untuk mencegah genangan"
        );
    }

    #[test]
    fn mock_report_is_the_fixed_sunny_payload() {
        let report = mock_report();
        assert_eq!(report.temperature, 30.0);
        assert_eq!(report.condition, "sunny");
        assert_eq!(report.location, "Jakarta");
    }
}
