/*!
 * Minecraft language codes.
 *
 * Minecraft names its locales `<language>_<region>` (`ja_jp`, `pt_br`) plus a
 * handful of joke and constructed languages. Versions up to 1.10 write the
 * region in upper case (`ja_JP`).
 */

use isolang::Language;

use crate::errors::ConfigError;

/// A locale known to Minecraft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinecraftLanguage {
    /// Locale code, lower case
    pub code: &'static str,
    /// Name of the language in itself
    pub native: &'static str,
    /// English name, used in prompts
    pub english: &'static str,
}

/// All locales supported by Minecraft
pub const MINECRAFT_LANGUAGES: &[MinecraftLanguage] = &[
    MinecraftLanguage { code: "af_za", native: "Afrikaans (Suid-Afrika)", english: "Afrikaans" },
    MinecraftLanguage { code: "ar_sa", native: "العربية (العالم العربي)", english: "Arabic" },
    MinecraftLanguage { code: "ast_es", native: "Asturianu (Asturies)", english: "Asturian" },
    MinecraftLanguage { code: "az_az", native: "Azərbaycanca (Azərbaycan)", english: "Azerbaijani" },
    MinecraftLanguage { code: "ba_ru", native: "Башҡортса (Башҡортостан)", english: "Bashkir" },
    MinecraftLanguage { code: "bar", native: "Boarisch", english: "Bavarian" },
    MinecraftLanguage { code: "be_by", native: "Беларуская (Беларусь)", english: "Belarusian" },
    MinecraftLanguage { code: "bg_bg", native: "Български (България)", english: "Bulgarian" },
    MinecraftLanguage { code: "br_fr", native: "Brezhoneg (Breizh)", english: "Breton" },
    MinecraftLanguage { code: "brb", native: "Barbadian Creole", english: "Barbadian Creole" },
    MinecraftLanguage { code: "bs_ba", native: "Bosanski (Bosna i Hercegovina)", english: "Bosnian" },
    MinecraftLanguage { code: "ca_es", native: "Català (Catalunya)", english: "Catalan" },
    MinecraftLanguage { code: "cs_cz", native: "Čeština (Česká republika)", english: "Czech" },
    MinecraftLanguage { code: "cy_gb", native: "Cymraeg (Cymru)", english: "Welsh" },
    MinecraftLanguage { code: "da_dk", native: "Dansk (Danmark)", english: "Danish" },
    MinecraftLanguage { code: "de_at", native: "Deutsch (Österreich)", english: "German (Austria)" },
    MinecraftLanguage { code: "de_ch", native: "Deutsch (Schweiz)", english: "German (Switzerland)" },
    MinecraftLanguage { code: "de_de", native: "Deutsch (Deutschland)", english: "German (Germany)" },
    MinecraftLanguage { code: "el_gr", native: "Ελληνικά (Ελλάδα)", english: "Greek" },
    MinecraftLanguage { code: "en_au", native: "English (Australia)", english: "English (Australia)" },
    MinecraftLanguage { code: "en_ca", native: "English (Canada)", english: "English (Canada)" },
    MinecraftLanguage { code: "en_gb", native: "English (United Kingdom)", english: "English (United Kingdom)" },
    MinecraftLanguage { code: "en_nz", native: "English (New Zealand)", english: "English (New Zealand)" },
    MinecraftLanguage { code: "en_pt", native: "Pirate Speak", english: "Pirate Speak" },
    MinecraftLanguage { code: "en_ud", native: "ǝƃɐnƃuɐl ɥsᴉlƃuǝ", english: "English (Upside Down)" },
    MinecraftLanguage { code: "en_us", native: "English (US)", english: "English (US)" },
    MinecraftLanguage { code: "enp", native: "ǝnbᴉʇuɐ sᴉɥ┴", english: "Neapolitan" },
    MinecraftLanguage { code: "enws", native: "Early Modern English", english: "Early Modern English" },
    MinecraftLanguage { code: "eo_uy", native: "Esperanto", english: "Esperanto" },
    MinecraftLanguage { code: "es_ar", native: "Español (Argentina)", english: "Spanish (Argentina)" },
    MinecraftLanguage { code: "es_cl", native: "Español (Chile)", english: "Spanish (Chile)" },
    MinecraftLanguage { code: "es_ec", native: "Español (Ecuador)", english: "Spanish (Ecuador)" },
    MinecraftLanguage { code: "es_es", native: "Español (España)", english: "Spanish (Spain)" },
    MinecraftLanguage { code: "es_mx", native: "Español (México)", english: "Spanish (Mexico)" },
    MinecraftLanguage { code: "es_uy", native: "Español (Uruguay)", english: "Spanish (Uruguay)" },
    MinecraftLanguage { code: "es_ve", native: "Español (Venezuela)", english: "Spanish (Venezuela)" },
    MinecraftLanguage { code: "esan", native: "Esánski", english: "Esan" },
    MinecraftLanguage { code: "et_ee", native: "Eesti (Eesti)", english: "Estonian" },
    MinecraftLanguage { code: "eu_es", native: "Euskera (Euskadi)", english: "Basque" },
    MinecraftLanguage { code: "fa_ir", native: "فارسی (ایران)", english: "Persian" },
    MinecraftLanguage { code: "fi_fi", native: "Suomi (Suomi)", english: "Finnish" },
    MinecraftLanguage { code: "fil_ph", native: "Filipino (Pilipinas)", english: "Filipino" },
    MinecraftLanguage { code: "fo_fo", native: "Føroyskt (Føroyar)", english: "Faroese" },
    MinecraftLanguage { code: "fr_ca", native: "Français (Canada)", english: "French (Canada)" },
    MinecraftLanguage { code: "fr_fr", native: "Français (France)", english: "French (France)" },
    MinecraftLanguage { code: "fra_de", native: "Fränkisch (Franken)", english: "Franconian" },
    MinecraftLanguage { code: "fy_nl", native: "Frysk (Fryslân)", english: "Frisian" },
    MinecraftLanguage { code: "ga_ie", native: "Gaeilge (Éire)", english: "Irish" },
    MinecraftLanguage { code: "gd_gb", native: "Gàidhlig (Alba)", english: "Scottish Gaelic" },
    MinecraftLanguage { code: "gl_es", native: "Galego (Galicia)", english: "Galician" },
    MinecraftLanguage { code: "got_de", native: "𐌲𐌿𐍄𐌹𐍃𐌺", english: "Gothic" },
    MinecraftLanguage { code: "gv_im", native: "Gaelg (Ellan Vannin)", english: "Manx" },
    MinecraftLanguage { code: "haw_us", native: "ʻŌlelo Hawaiʻi (Hawaiʻi)", english: "Hawaiian" },
    MinecraftLanguage { code: "he_il", native: "עברית (ישראל)", english: "Hebrew" },
    MinecraftLanguage { code: "hi_in", native: "हिन्दी (भारत)", english: "Hindi" },
    MinecraftLanguage { code: "hr_hr", native: "Hrvatski (Hrvatska)", english: "Croatian" },
    MinecraftLanguage { code: "hu_hu", native: "Magyar (Magyarország)", english: "Hungarian" },
    MinecraftLanguage { code: "hy_am", native: "Հայերեն (Հայաստան)", english: "Armenian" },
    MinecraftLanguage { code: "id_id", native: "Bahasa Indonesia (Indonesia)", english: "Indonesian" },
    MinecraftLanguage { code: "ig_ng", native: "Igbo (Nigeria)", english: "Igbo" },
    MinecraftLanguage { code: "io_en", native: "Ido", english: "Ido" },
    MinecraftLanguage { code: "is_is", native: "Íslenska (Ísland)", english: "Icelandic" },
    MinecraftLanguage { code: "isv", native: "Medžuslovjansky", english: "Interslavic" },
    MinecraftLanguage { code: "it_it", native: "Italiano (Italia)", english: "Italian" },
    MinecraftLanguage { code: "ja_jp", native: "日本語 (日本)", english: "Japanese" },
    MinecraftLanguage { code: "jbo_en", native: "la .lojban.", english: "Lojban" },
    MinecraftLanguage { code: "ka_ge", native: "ქართული (საქართველო)", english: "Georgian" },
    MinecraftLanguage { code: "kk_kz", native: "Қазақша (Қазақстан)", english: "Kazakh" },
    MinecraftLanguage { code: "kn_in", native: "ಕನ್ನಡ (ಭಾರತ)", english: "Kannada" },
    MinecraftLanguage { code: "ko_kr", native: "한국어 (대한민국)", english: "Korean" },
    MinecraftLanguage { code: "ksh", native: "Kölsch", english: "Ripuarian" },
    MinecraftLanguage { code: "kw_gb", native: "Kernowek (Kernow)", english: "Cornish" },
    MinecraftLanguage { code: "la_la", native: "Latina", english: "Latin" },
    MinecraftLanguage { code: "lb_lu", native: "Lëtzebuergesch (Lëtzebuerg)", english: "Luxembourgish" },
    MinecraftLanguage { code: "li_li", native: "Limburgs", english: "Limburgish" },
    MinecraftLanguage { code: "lmo", native: "Lombard", english: "Lombard" },
    MinecraftLanguage { code: "lol_us", native: "LOLCAT", english: "LOLCAT" },
    MinecraftLanguage { code: "lt_lt", native: "Lietuvių (Lietuva)", english: "Lithuanian" },
    MinecraftLanguage { code: "lv_lv", native: "Latviešu (Latvija)", english: "Latvian" },
    MinecraftLanguage { code: "lzh", native: "文言文", english: "Literary Chinese" },
    MinecraftLanguage { code: "mk_mk", native: "Македонски (Македонија)", english: "Macedonian" },
    MinecraftLanguage { code: "mn_mn", native: "Монгол (Монгол)", english: "Mongolian" },
    MinecraftLanguage { code: "ms_my", native: "Bahasa Melayu (Malaysia)", english: "Malay" },
    MinecraftLanguage { code: "mt_mt", native: "Malti (Malta)", english: "Maltese" },
    MinecraftLanguage { code: "nds_de", native: "Plattdüütsch (Düütschland)", english: "Low German" },
    MinecraftLanguage { code: "nl_be", native: "Nederlands (België)", english: "Dutch (Belgium)" },
    MinecraftLanguage { code: "nl_nl", native: "Nederlands (Nederland)", english: "Dutch (Netherlands)" },
    MinecraftLanguage { code: "nn_no", native: "Norsk nynorsk (Noreg)", english: "Norwegian Nynorsk" },
    MinecraftLanguage { code: "no_no", native: "Norsk bokmål (Norge)", english: "Norwegian Bokmål" },
    MinecraftLanguage { code: "oc_fr", native: "Occitan (França)", english: "Occitan" },
    MinecraftLanguage { code: "ovd", native: "Övdalsk", english: "Elfdalian" },
    MinecraftLanguage { code: "pl_pl", native: "Polski (Polska)", english: "Polish" },
    MinecraftLanguage { code: "pt_br", native: "Português (Brasil)", english: "Portuguese (Brazil)" },
    MinecraftLanguage { code: "pt_pt", native: "Português (Portugal)", english: "Portuguese (Portugal)" },
    MinecraftLanguage { code: "qya_aa", native: "Quenya", english: "Quenya" },
    MinecraftLanguage { code: "ro_ro", native: "Română (România)", english: "Romanian" },
    MinecraftLanguage { code: "rpr", native: "Kitrall'", english: "Kitrall" },
    MinecraftLanguage { code: "ru_ru", native: "Русский (Россия)", english: "Russian" },
    MinecraftLanguage { code: "ry_ua", native: "Русиньскый (Русиньско)", english: "Rusyn" },
    MinecraftLanguage { code: "sah_sah", native: "Саха тыла (Саха сирэ)", english: "Sakha" },
    MinecraftLanguage { code: "se_no", native: "Davvisámegiella (Norga)", english: "Northern Sami" },
    MinecraftLanguage { code: "sk_sk", native: "Slovenčina (Slovensko)", english: "Slovak" },
    MinecraftLanguage { code: "sl_si", native: "Slovenščina (Slovenija)", english: "Slovenian" },
    MinecraftLanguage { code: "so_so", native: "Soomaali (Soomaaliya)", english: "Somali" },
    MinecraftLanguage { code: "sq_al", native: "Shqip (Shqipëria)", english: "Albanian" },
    MinecraftLanguage { code: "sr_sp", native: "Српски (Србија)", english: "Serbian" },
    MinecraftLanguage { code: "sv_se", native: "Svenska (Sverige)", english: "Swedish" },
    MinecraftLanguage { code: "swg", native: "Schwäbisch", english: "Swabian" },
    MinecraftLanguage { code: "sxu", native: "Schläsisch", english: "Upper Saxon" },
    MinecraftLanguage { code: "szl", native: "Ślōnskŏ gŏdka", english: "Silesian" },
    MinecraftLanguage { code: "ta_in", native: "தமிழ் (இந்தியா)", english: "Tamil" },
    MinecraftLanguage { code: "th_th", native: "ไทย (ประเทศไทย)", english: "Thai" },
    MinecraftLanguage { code: "tl_ph", native: "Tagalog (Pilipinas)", english: "Tagalog" },
    MinecraftLanguage { code: "tlh_aa", native: "tlhIngan Hol", english: "Klingon" },
    MinecraftLanguage { code: "tok", native: "toki pona", english: "Toki Pona" },
    MinecraftLanguage { code: "tr_tr", native: "Türkçe (Türkiye)", english: "Turkish" },
    MinecraftLanguage { code: "tt_ru", native: "Татарча (Россия)", english: "Tatar" },
    MinecraftLanguage { code: "uk_ua", native: "Українська (Україна)", english: "Ukrainian" },
    MinecraftLanguage { code: "val_es", native: "Valencià (País Valencià)", english: "Valencian" },
    MinecraftLanguage { code: "vec_it", native: "Vèneto", english: "Venetian" },
    MinecraftLanguage { code: "vi_vn", native: "Tiếng Việt (Việt Nam)", english: "Vietnamese" },
    MinecraftLanguage { code: "yi_de", native: "ײִדיש (דײַטשלאַנד)", english: "Yiddish" },
    MinecraftLanguage { code: "yo_ng", native: "Yorùbá (Nàìjíríà)", english: "Yoruba" },
    MinecraftLanguage { code: "zh_cn", native: "简体中文（中国大陆）", english: "Chinese (Simplified)" },
    MinecraftLanguage { code: "zh_hk", native: "繁體中文（香港特別行政區）", english: "Chinese (Hong Kong)" },
    MinecraftLanguage { code: "zh_tw", native: "繁體中文（台灣）", english: "Chinese (Traditional)" },
    MinecraftLanguage { code: "zlm_arab", native: "بهاس ملايو", english: "Malay (Arabic script)" },
];

/// Look up a locale by code, case-insensitively
pub fn get_language(code: &str) -> Option<&'static MinecraftLanguage> {
    let normalized = code.trim().to_lowercase();
    MINECRAFT_LANGUAGES.iter().find(|lang| lang.code == normalized)
}

/// Check that a code names a Minecraft locale
pub fn validate_language_code(code: &str) -> Result<&'static MinecraftLanguage, ConfigError> {
    get_language(code).ok_or_else(|| ConfigError::UnsupportedLanguage(code.to_string()))
}

/// All supported locale codes
pub fn supported_language_codes() -> Vec<&'static str> {
    MINECRAFT_LANGUAGES.iter().map(|lang| lang.code).collect()
}

/// Human-readable language name for prompts
///
/// Minecraft locales use their English name; bare ISO 639 codes fall back to
/// the ISO name; anything else is returned as given.
pub fn language_name_for_prompt(code: &str) -> String {
    if let Some(lang) = get_language(code) {
        return lang.english.to_string();
    }

    let normalized = code.trim().to_lowercase();
    let iso = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    iso.map(|lang| lang.to_name().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Format a locale code the way a given Minecraft version expects it
pub fn format_language_code_for_version(code: &str, minecraft_version: &str) -> Result<String, ConfigError> {
    let lang = validate_language_code(code)?;

    if is_legacy_version(minecraft_version) {
        if let Some((language, region)) = lang.code.split_once('_') {
            return Ok(format!("{}_{}", language, region.to_uppercase()));
        }
    }

    Ok(lang.code.to_string())
}

/// Whether a version string is 1.10.x or older
pub fn is_legacy_version(version: &str) -> bool {
    let mut parts = version.trim().split('.').map(|p| p.parse::<u32>().ok());
    match (parts.next().flatten(), parts.next().flatten()) {
        (Some(major), Some(minor)) => major == 1 && minor <= 10,
        (Some(major), None) => major < 1,
        _ => false,
    }
}
