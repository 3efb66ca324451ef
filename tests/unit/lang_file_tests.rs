/*!
 * Tests for plain translation file reading and writing
 */

use anyhow::Result;
use modlocalizer::errors::FormatError;
use modlocalizer::lang_file::{self, LangFormat};

use crate::common;

#[test]
fn test_readFile_jsonLangFile_shouldReturnAllKeys() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "en_us.json", common::SAMPLE_LANG_JSON)?;

    let (data, format) = lang_file::read_file(&path)?;

    assert_eq!(format, LangFormat::Json);
    assert_eq!(data.len(), 4);
    assert_eq!(data["block.examplemod.anvil"], "Reinforced Anvil");
    Ok(())
}

#[test]
fn test_writeThenRead_shouldRoundTripBothFormats() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en_us.json", common::SAMPLE_LANG_JSON)?;
    let (data, _) = lang_file::read_file(&source)?;

    for (name, format) in [("copy/en_us.json", LangFormat::Json), ("copy/en_US.lang", LangFormat::Lang)] {
        let path = temp_dir.path().join(name);
        lang_file::write_file(&path, &data, format)?;

        let (reparsed, detected) = lang_file::read_file(&path)?;
        assert_eq!(detected, format);
        assert_eq!(reparsed, data);
    }
    Ok(())
}

#[test]
fn test_readFile_legacyLang_shouldHandleCommentsAndEquals() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "# Example mod\n\nitem.hammer.name=Hammer\ntooltip.hammer=Deals 2x=damage\n";
    let path = common::create_test_file(temp_dir.path(), "en_US.lang", content)?;

    let (data, format) = lang_file::read_file(&path)?;

    assert_eq!(format, LangFormat::Lang);
    assert_eq!(data.len(), 2);
    assert_eq!(data["tooltip.hammer"], "Deals 2x=damage");
    Ok(())
}

#[test]
fn test_readFile_snbt_shouldBeUnsupported() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "chapter.snbt", "{}")?;

    let result = lang_file::read_file(&path);

    assert!(matches!(result, Err(FormatError::Unsupported(_))));
    Ok(())
}

#[test]
fn test_readFile_malformedJson_shouldReturnParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "en_us.json", "{\"a\": ")?;

    assert!(matches!(lang_file::read_file(&path), Err(FormatError::Parse { .. })));
    Ok(())
}
