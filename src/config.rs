use std::env;

use anyhow::Result;
use once_cell::sync::Lazy;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_upload_bytes: usize,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_temperature: f32,
    pub gemini_top_k: i32,
    pub gemini_top_p: f32,
    pub gemini_max_output_tokens: i32,
    pub gemini_safety_settings: String,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .unwrap_or(default)
}

fn env_i32(name: &str, default: i32) -> i32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(default)
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(default)
}

fn normalize_gemini_safety_settings(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "permissive".to_string();
    }

    let lowered = trimmed.to_lowercase();
    match lowered.as_str() {
        "permissive" | "off" | "none" => "permissive".to_string(),
        "standard" => "standard".to_string(),
        _ => {
            warn!(
                "Unknown GEMINI_SAFETY_SETTINGS value '{}'; defaulting to permissive.",
                value
            );
            "permissive".to_string()
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Config {
            host: env_string("HOST", "0.0.0.0"),
            port: env_u16("PORT", 3000),
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            max_upload_bytes: env_usize("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            gemini_api_key: env_string("GEMINI_API_KEY", ""),
            gemini_model: env_string("GEMINI_MODEL", "gemini-2.5-flash"),
            gemini_temperature: env_f32("GEMINI_TEMPERATURE", 0.7),
            gemini_top_k: env_i32("GEMINI_TOP_K", 40),
            gemini_top_p: env_f32("GEMINI_TOP_P", 0.95),
            gemini_max_output_tokens: env_i32("GEMINI_MAX_OUTPUT_TOKENS", 8192),
            gemini_safety_settings: normalize_gemini_safety_settings(env_string(
                "GEMINI_SAFETY_SETTINGS",
                "permissive",
            )),
        })
    }
}

// Fixed instruction templates for the analysis call. `{location_guidance}` is
// filled with one of the two location templates below; the pair of templates
// is the only place where the prompt branches on location presence.
pub const ANALYSIS_PROMPT: &str = "Analyze this image to identify the animal's breed or species. Be comprehensive; this covers common pets like cats and dogs as well as birds, reptiles, farm animals, and other wildlife. If it is a mixed breed, say so. Provide a full profile including its history, temperament, physical characteristics (lifespan, height, weight), origin, and diet. Estimate the animal's age from visual evidence (e.g. 'Kitten, 3-6 months', 'Adult, 5-7 years'). Provide detailed care requirements covering diet, exercise, and grooming, and describe common health issues. Finally, provide a typical hygiene and grooming schedule with tasks (such as bathing or brushing) and their frequencies. {location_guidance} IMPORTANT: Do not provide specific medical advice. Instead, describe potential health concerns and strongly recommend consulting a qualified veterinarian. Provide your analysis in the required JSON format. The confidence score is your estimated certainty from 0.0 to 1.0.";

pub const LOCATION_SERVICES_PROMPT: &str = "The user is approximately at latitude {latitude} and longitude {longitude}. Based on this, generate a list of 3-4 hypothetical but realistic-sounding nearby pet supply stores with addresses and star ratings (out of 5), and a list of 2-3 hypothetical nearby veterinary hospitals with addresses and operating hours. Make the generated names and addresses sound plausible for the general area. IMPORTANTLY, also identify the user's likely country and region and provide contact information for 1-2 major, real national or regional animal welfare organizations or official animal control resources (e.g. ASPCA for the US, RSPCA for the UK). For each, include the organization's name, a valid contact number or website, and a brief description of what they do.";

pub const GENERIC_SERVICES_PROMPT: &str = "The user has not provided their location. Generate generic, illustrative examples for nearby pet stores and vets instead of a location-specific list. Omit the local welfare section.";
