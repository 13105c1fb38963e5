//! Integration tests for weaving module files into shader templates

use std::fs;
use std::path::Path;

use module_weaver::{weave, ModuleRegistry, RegistryError, WeaveWarning, WeaverConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const RIM: &str = "\
#VARIABLES
\tfloat _RimMin;
#END

#INPUT
\tfloat3 viewDir;
#END

#FUNCTIONS
\tfloat rimTerm(float3 n) { return n.x; }
#END

#VERTEX:main(float3 pos)
\tfloat3 p = pos;
#END

#FRAGMENT:rim(float3 normal)
\tfloat r = rimTerm(normal);
#ENABLE_IMPL: float r
\tr *= 2;
#DISABLE_IMPL
#END
";

const OUTLINE: &str = "\
#VARIABLES
\t\tfloat _OutlineWidth;
#END

#INPUT
\t\tfloat4 screenPos;
#END
";

fn modules_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "Rim", RIM);
    write_module(dir.path(), "Outline", OUTLINE);
    dir
}

fn write_module(dir: &Path, name: &str, source: &str) {
    fs::write(dir.join(format!("Module_{}.txt", name)), source).unwrap();
}

fn registry(dir: &TempDir) -> ModuleRegistry {
    ModuleRegistry::with_config(WeaverConfig::new().with_modules_dir(dir.path()))
}

#[test]
fn test_weave_full_template() {
    let dir = modules_dir();
    let template = "\
Shader \"Toon\"
{
#MODULES
Rim
Outline
#END
\tCGINCLUDE
\t[[MODULE:VARIABLES:Outline]]
\t[[MODULE:VARIABLES]]
\tstruct Input
\t{
\t\t[[MODULE:INPUT]]
\t};
\tvoid vert(inout appdata v)
\t{
\t\t[[MODULE:VERTEX:Rim:main(v.vertex.xyz)]]
\t}
\tvoid surf(Input IN)
\t{
\t\t[[MODULE:FRAGMENT:Rim:rim(IN.normal)]]
\t}
}";

    let woven = weave(template, &mut registry(&dir));
    assert!(woven.is_clean(), "{:?}", woven.warnings);
    assert_eq!(woven.modules, vec!["Rim".to_string(), "Outline".to_string()]);
    assert_eq!(
        woven.text(),
        "\
Shader \"Toon\"
{
\tCGINCLUDE
\tfloat _OutlineWidth;
\tfloat _RimMin;
\tstruct Input
\t{
\t\tfloat3 viewDir;
\t\tfloat4 screenPos;
\t};
\tvoid vert(inout appdata v)
\t{
\t\tfloat3 p = v.vertex.xyz;
\t}
\tvoid surf(Input IN)
\t{
\t\tfloat r = rimTerm(IN.normal);
#ENABLE_IMPL: float r
\t\tr *= 2;
#DISABLE_IMPL
\t}
}"
    );
}

#[test]
fn test_module_specific_tag_always_emits() {
    let dir = modules_dir();
    let template = "\
#MODULES
Rim
#END
[[MODULE:FUNCTIONS]]
[[MODULE:FUNCTIONS:Rim]]";

    let woven = weave(template, &mut registry(&dir));
    assert_eq!(
        woven.lines,
        vec![
            "float rimTerm(float3 n) { return n.x; }",
            "float rimTerm(float3 n) { return n.x; }",
        ]
    );
}

#[test]
fn test_keywords_are_not_tracked() {
    let dir = modules_dir();
    write_module(
        dir.path(),
        "Ramp",
        "#KEYWORDS\n\t#pragma shader_feature_local TCP2_RAMPTEXT\n#END\n",
    );
    let template = "\
#MODULES
Ramp
#END
[[MODULE:KEYWORDS:Ramp]]
[[MODULE:KEYWORDS]]";

    let woven = weave(template, &mut registry(&dir));
    assert_eq!(
        woven.lines,
        vec![
            "#pragma shader_feature_local TCP2_RAMPTEXT",
            "#pragma shader_feature_local TCP2_RAMPTEXT",
        ]
    );
}

#[test]
fn test_modules_block_skips_comments_and_duplicates() {
    let dir = modules_dir();
    let template = "\
#MODULES
// Rim lighting
Rim

Rim
#END
[[MODULE:VARIABLES]]";

    let woven = weave(template, &mut registry(&dir));
    assert!(woven.is_clean());
    assert_eq!(woven.modules, vec!["Rim".to_string()]);
    assert_eq!(woven.lines, vec!["float _RimMin;"]);
}

#[test]
fn test_missing_module_file_is_a_warning() {
    let dir = modules_dir();
    let template = "\
#MODULES
Rim
Specular
#END
[[MODULE:VARIABLES]]";

    let woven = weave(template, &mut registry(&dir));
    assert_eq!(woven.lines, vec!["float _RimMin;"]);
    match woven.warnings.as_slice() {
        [WeaveWarning::ModuleLoad {
            line,
            name,
            source: RegistryError::NotFound { path, .. },
        }] => {
            assert_eq!(*line, 3);
            assert_eq!(name, "Specular");
            assert_eq!(path, &dir.path().join("Module_Specular.txt"));
        }
        other => panic!("expected a single ModuleLoad warning, got {other:?}"),
    }
}

#[test]
fn test_module_parse_error_is_a_warning() {
    let dir = modules_dir();
    write_module(dir.path(), "Broken", "#VERTEX:main(float3)\n#END\n");
    let template = "#MODULES\nBroken\n#END\nbody";

    let woven = weave(template, &mut registry(&dir));
    assert_eq!(woven.lines, vec!["body"]);
    assert!(matches!(
        woven.warnings.as_slice(),
        [WeaveWarning::ModuleLoad { source: RegistryError::Parse(_), .. }]
    ));
}

#[test]
fn test_arity_mismatch_still_emits_code() {
    let dir = modules_dir();
    let template = "\
#MODULES
Rim
#END
\t[[MODULE:VERTEX:Rim:main(a, b)]]";

    let woven = weave(template, &mut registry(&dir));
    assert_eq!(woven.lines, vec!["\tfloat3 p = a;"]);
    assert!(matches!(
        woven.warnings.as_slice(),
        [WeaveWarning::Expand { line: 4, .. }]
    ));
}

#[test]
fn test_call_site_arguments_keep_nested_calls() {
    let dir = modules_dir();
    write_module(
        dir.path(),
        "Blend",
        "#VERTEX:k(float a, float3 b)\n\tx = a + b;\n#END\n",
    );
    let template = "\
#MODULES
Blend
#END
\t[[MODULE:VERTEX:Blend:k(dot(u,v), float3(0,0,0))]]";

    let woven = weave(template, &mut registry(&dir));
    assert!(woven.is_clean(), "{:?}", woven.warnings);
    assert_eq!(woven.lines, vec!["\tx = dot(u,v) + float3(0,0,0);"]);
}

#[test]
fn test_tag_problems_emit_nothing() {
    let dir = modules_dir();
    let template = "\
#MODULES
Rim
#END
[[MODULE:VARIABLES:Outline]]
[[MODULE:VERTEX]]
[[MODULE:SURFACE:Rim]]
[[MODULE:FRAGMENT:Rim:missing]]
done";

    let woven = weave(template, &mut registry(&dir));
    assert_eq!(woven.lines, vec!["done"]);
    assert!(matches!(
        woven.warnings.as_slice(),
        [
            WeaveWarning::UnknownModule { line: 4, .. },
            WeaveWarning::MissingModuleName { line: 5, .. },
            WeaveWarning::UnknownTag { line: 6, .. },
            WeaveWarning::Expand { line: 7, .. },
        ]
    ));
}

#[test]
fn test_config_file_controls_module_lookup() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Mod-Rim.shadermodule"), RIM).unwrap();
    let config_path = dir.path().join("weaver.toml");
    fs::write(
        &config_path,
        format!(
            "[modules]\ndirectory = {:?}\nprefix = \"Mod-\"\nextension = \"shadermodule\"\n",
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let config = WeaverConfig::from_file(&config_path).unwrap();
    let woven = module_weaver::weave_with_config("#MODULES\nRim\n#END\n[[MODULE:INPUT]]", config);
    assert!(woven.is_clean(), "{:?}", woven.warnings);
    assert_eq!(woven.lines, vec!["float3 viewDir;"]);
}

#[test]
fn test_module_summary() {
    let dir = modules_dir();
    let mut registry = registry(&dir);
    let module = registry.get_module("Rim").unwrap();
    insta::assert_snapshot!(module.to_string(), @r"
    module: Rim
    FUNCTIONS: 1 line(s)
    VARIABLES: 1 line(s)
    INPUT: 1 line(s)
    VERTEX:main(float3 pos): 1 line(s)
    FRAGMENT:rim(float3 normal): 4 line(s)
    ");
}
