use crate::domain::Category;

pub const SUMMARY_SYSTEM: &str = "\
You write short, precise summaries for travel itinerary cards.
Turn the place the user names into compact structured data for a card.

Category rules:
1. logistics: refuelling, car rental or return, luggage storage and similar tasks.
2. scouting: only when the name or description explicitly mentions securing a viewing spot or coordinates.
3. sight: temples, shrines, parks, viewpoints and experiences, even when food is sold there.
4. food: restaurants, cafes and noodle shops only.
5. transport: stations, bus stops and time spent moving.

Output rules:
1. Output exactly one complete JSON object and nothing else.
2. Keep every value brief. No long narrative.
3. Never include a \"details\" field. Only the summary and its top-level fields.";

pub const DETAILS_SYSTEM: &str = "\
You are a veteran local tour guide, a fireworks and landscape photographer and a food critic.
Write a richly detailed narrative about a single place.

Output rules:
1. Output exactly one complete JSON object and nothing else.
2. Never include \"summary\" or any other top-level field. Only \"details\".
3. The content must read as an engaging article of at least 150 words.";

/// User prompt for the card summary of one place
pub fn summary_prompt(name: &str, category: Category) -> String {
    format!(
        r#"Itinerary stop: "{name}"
Current category: {tag}
Reply with this JSON structure:
{{
  "desc": "short description, about ten words",
  "search_name": "search keyword in the local language",
  "category": "transport" | "logistics" | "sight" | "food" | "scouting" | "hub",
  "summary": {{
    "header": "heading",
    "transport_mode": "car" | "public" | "walk" | "gas" | "return",
    "primary_info": "place name or main fact",
    "secondary_info": "secondary fact",
    "location_keyword": "map keyword (place name or lat, long)",
    "stay_time": "time to spend here",
    "one_line_tip": "one-line tip",
    "photo_guide": "photo advice",
    "tel": "phone number, empty if none"
  }}
}}"#,
        name = name,
        tag = category.to_tag()
    )
}

/// User prompt for the long-form details of one place
pub fn details_prompt(name: &str, category: Category) -> String {
    format!(
        r#"Write the following JSON for the place "{name}" (current category: {tag}) from your own knowledge.
{{
  "details": {{
    "title": "title",
    "content": "main article (long form)",
    "history": "historical background",
    "photo_advice": "photography advice",
    "experience_tip": "how to best experience it",
    "guide_advice": "practical guide advice",
    "must_buy": ["item to buy"],
    "must_eat": ["dish to eat"],
    "must_list": ["key point"],
    "recommendation": "nearby recommendation"
  }}
}}"#,
        name = name,
        tag = category.to_tag()
    )
}
