use tripweave_planner::SelectionSet;
use tripweave_shared::{DayPlan, Itinerary, MapPoint, TripConfig, format_date};

pub fn districts(city: &str) -> String {
    format!(
        "For the city of {city}, list its main districts or neighborhoods popular with tourists. \
         For each one, provide a short, catchy description. Use up-to-date information from Google Maps. \
         Return the result as a JSON array of objects, where each object has \"name\" and \"description\" properties."
    )
}

pub fn pois(city: &str, district: &str) -> String {
    format!(
        "In the {district} of {city}, list the top 5 tourist attractions and top 5 highly-rated restaurants \
         based on Google Maps data. For attractions, include \"name\", a short \"description\", an estimated \
         visit \"duration\" (e.g., '1-2 hours'), and a \"rating\" out of 5. For restaurants, include \"name\", \
         the \"cuisine\" type, a \"price\" range ($, $$ or $$$), and \"reservations\" telling if they are \
         recommended. Return the result as a JSON object with two keys: \"attractions\" and \"restaurants\", \
         each containing an array of the respective items."
    )
}

pub fn itinerary(trip: &TripConfig, selections: &SelectionSet) -> String {
    let interests = trip
        .names()
        .map(|name| {
            let picks = selections
                .get(name)
                .unwrap_or_default()
                .iter()
                .map(|poi| format!("- {} ({})", poi.name, poi.kind))
                .collect::<Vec<_>>()
                .join("\n");

            format!("For {name}, the traveler is interested in:\n{picks}")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let destinations = trip.names().collect::<Vec<_>>().join(", ");
    let dates = trip.dates();

    format!(
        r#"You are a world-class travel planner. Create a detailed, optimized, day-by-day itinerary for a trip.

Trip details:
- Destinations (in order): {destinations}
- Travel dates: {start} to {end} ({days} days)

Traveler's interests:
{interests}

Instructions:
1. Allocate the days sensibly across the destinations, in the given order.
2. For each day, create a schedule for "morning", "afternoon" and "evening".
3. Group attractions that are geographically close to minimize travel time.
4. Include realistic travel times and modes (walking, metro, taxi) between activities.
5. Give each activity a brief, engaging description. Suggest lunch and dinner spots from the selections or nearby highly-rated options.
6. Title each day "<theme> in <city>".

Return the plan as a single JSON object with one key per date in YYYY-MM-DD format, covering every date of the trip. Each value is an object with "title", "summary", and arrays "morning", "afternoon" and "evening". Each activity has "time", "activity", "description" and "location", and may include "details" and "travelToNext" (with "mode" and "duration").

Example activity:
{{
  "time": "10:00 AM - 1:00 PM",
  "activity": "Visit the Louvre Museum",
  "description": "Explore one of the world's largest art museums.",
  "location": "Rue de Rivoli, 75001 Paris, France",
  "travelToNext": {{ "mode": "Metro", "duration": "15 minutes" }}
}}

Respond with ONLY the raw JSON object, no prose and no markdown fences."#,
        start = format_date(dates.start),
        end = format_date(dates.end),
        days = dates.days(),
    )
}

/// `None` when the day has nothing to put on a map.
pub fn day_map(day: &DayPlan) -> Option<String> {
    let stops = numbered(day.activities().map(|a| a.activity.as_str()));
    if stops.is_empty() {
        return None;
    }

    Some(format!(
        r#"Create a stylized, visually appealing tourist map for a day trip titled "{title}".
The map should clearly show the following locations in order, with a dotted line or arrows indicating the travel path between them:
{stops}

Label each location on the map with its corresponding number.
The style should be colorful and illustrative, like a hand-drawn map in a travel journal. Do not use a realistic satellite or street map style."#,
        title = day.title,
    ))
}

pub fn overall_map(itinerary: &Itinerary) -> String {
    let stops = numbered(itinerary.cities().into_iter());

    format!(
        r#"Create a stylized, visually appealing tourist map for an entire trip.
The map should show the travel route between the following destinations in order:
{stops}

The style should be like a vintage travel poster. Illustrate each destination with a small, iconic landmark and connect them with a dotted line showing the journey's progression.
The overall title should be "My Epic Journey".
Do not use a realistic satellite or street map style."#
    )
}

pub fn region_map(region: &str) -> String {
    format!(
        r#"Create a simple, stylized map of {region} suitable for a travel planning app.
- Style: clean and modern, with a light-colored background.
- Labels: clearly label the major tourist cities with a legible font.
- Features: include major rivers as simple lines.
- Leave out roads, borders and other clutter."#
    )
}

pub fn identify(point: MapPoint) -> String {
    format!(
        r#"Analyze the provided map image. A user clicked at the coordinate ({x}, {y}).
The image dimensions are {width}x{height} pixels.
Identify the major city label closest to this click point.
Respond with ONLY the name of the city, for example: Beijing. If no city is nearby, respond with Unknown."#,
        x = point.x,
        y = point.y,
        width = point.width,
        height = point.height,
    )
}

fn numbered<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
