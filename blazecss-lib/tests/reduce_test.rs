use blazecss_lib::{generate, reduce_stylesheet, BlazeError, FontMatchPolicy, ReduceConfig};
use pretty_assertions::assert_eq;

fn reduce(html: &str, css: &str) -> String {
    reduce_stylesheet(html, css, &ReduceConfig::default()).unwrap()
}

#[test]
fn test_unmatched_rule_is_dropped() {
    let css = reduce(r#"<div class="a"></div>"#, ".a{color:red} .b{color:blue}");
    assert!(css.contains(".a"));
    assert!(css.contains("red"));
    assert!(!css.contains(".b"));
    assert!(!css.contains("blue"));
}

#[test]
fn test_hover_rule_keeps_original_selector() {
    let css = reduce(r#"<div class="a"></div>"#, ".a:hover{color:red}");
    assert!(css.contains(".a:hover"));

    let css = reduce(r#"<div class="b"></div>"#, ".a:hover{color:red}");
    assert!(!css.contains(".a"));
}

#[test]
fn test_pseudo_elements_are_stripped_before_matching() {
    let css = reduce(
        r#"<p class="note"></p>"#,
        ".note::before{content:'!'} .note:after{content:'?'} .gone::before{content:'x'}",
    );
    assert!(css.contains(".note:before"));
    assert!(css.contains(".note:after"));
    assert!(!css.contains(".gone"));
}

#[test]
fn test_font_face_follows_its_users() {
    let css = r#"@font-face{font-family:"Roboto";font-weight:400} .a{font-family:Roboto}"#;

    let kept = reduce(r#"<div class="a"></div>"#, css);
    assert!(kept.contains("@font-face"));

    let dropped = reduce(r#"<div class="z"></div>"#, css);
    assert!(!dropped.contains("@font-face"));
    assert!(!dropped.contains("Roboto"));
}

#[test]
fn test_keyframes_follow_their_users() {
    let css = "@keyframes spin{0%{transform:rotate(0)}} .a{animation:spin 2s}";

    let kept = reduce(r#"<div class="a"></div>"#, css);
    assert!(kept.contains("@keyframes spin"));
    assert!(kept.contains("0%"));
    assert!(kept.contains(".a"));

    let dropped = reduce(r#"<div class="z"></div>"#, css);
    assert!(!dropped.contains("spin"));
    assert!(!dropped.contains("0%"));
    assert_eq!(dropped.trim(), "");
}

#[test]
fn test_vendor_prefixed_keyframes_are_pruned() {
    let css = "@-webkit-keyframes pulse{from{opacity:0}to{opacity:1}} \
               @-moz-keyframes pulse{from{opacity:0}to{opacity:1}} \
               @keyframes fade{from{opacity:0}to{opacity:1}} \
               .a{animation-name:fade}";
    let reduced = reduce(r#"<div class="a"></div>"#, css);
    assert!(!reduced.contains("pulse"));
    assert!(reduced.contains("@keyframes fade"));
}

#[test]
fn test_keyframe_selectors_are_not_treated_as_rules() {
    let css = "@keyframes grow{from{width:0}50%{width:5px}to{width:10px}} .a{animation:grow 1s}";
    let reduced = reduce(r#"<div class="a"></div>"#, css);
    assert!(reduced.contains("from"));
    assert!(reduced.contains("50%"));
    assert!(reduced.contains("to"));
}

#[test]
fn test_emptied_media_block_is_removed() {
    let css = reduce(
        r#"<div class="a"></div>"#,
        "@media (min-width:600px){.b{color:blue}} @media print{.a{color:black}}",
    );
    assert!(!css.contains("min-width"));
    assert!(css.contains("@media print"));
}

#[test]
fn test_nested_media_cascades() {
    let css = reduce(
        r#"<div class="a"></div>"#,
        "@media screen{@media (min-width:600px){.b{color:blue}}}",
    );
    assert!(!css.contains("@media"));
}

#[test]
fn test_force_include_keeps_rule_without_match() {
    let config = ReduceConfig::default()
        .with_force_include([r"\.modal"])
        .unwrap();
    let css = reduce_stylesheet(
        r#"<div class="a"></div>"#,
        ".modal{display:none} .dialog{display:none}",
        &config,
    )
    .unwrap();
    assert!(css.contains(".modal"));
    assert!(!css.contains(".dialog"));
}

#[test]
fn test_force_include_sees_unstripped_selector() {
    let config = ReduceConfig::default()
        .with_force_include([r":hover$"])
        .unwrap();
    let css = reduce_stylesheet("<div></div>", ".menu:hover{color:red}", &config).unwrap();
    assert!(css.contains(".menu:hover"));
}

#[test]
fn test_unsupported_selector_fails_open() {
    let css = reduce(
        "<div></div>",
        ".x:nth-child(2n+1){color:red} .y:not(.z){color:blue} .gone{color:green}",
    );
    assert!(css.contains(".x"));
    assert!(css.contains(".y"));
    assert!(!css.contains(".gone"));
}

#[test]
fn test_selector_list_lives_if_any_part_matches() {
    let css = reduce(r#"<span id="hit"></span>"#, ".miss, #hit{color:red}");
    assert!(css.contains(".miss"));
    assert!(css.contains("#hit"));
}

#[test]
fn test_font_policies_disagree_on_weight() {
    let html = r#"<p class="a"></p>"#;
    let css = r#"
        @font-face { font-family: "Lato"; font-weight: 700; src: url(lato-bold.woff2) }
        .a { font-family: Lato }
    "#;

    let descriptor = reduce_stylesheet(
        html,
        css,
        &ReduceConfig::default().with_font_policy(FontMatchPolicy::Descriptor),
    )
    .unwrap();
    assert!(!descriptor.contains("@font-face"));

    let strict = reduce_stylesheet(
        html,
        css,
        &ReduceConfig::default().with_font_policy(FontMatchPolicy::Strict),
    )
    .unwrap();
    assert!(strict.contains("@font-face"));
}

#[test]
fn test_font_used_inside_keyframes_is_kept() {
    let css = r#"
        @font-face { font-family: "Bungee"; src: url(bungee.woff2) }
        @keyframes swap { to { font-family: Bungee } }
        .a { animation: swap 1s }
    "#;
    let reduced = reduce(r#"<div class="a"></div>"#, css);
    assert!(reduced.contains("@font-face"));
}

#[test]
fn test_reduction_is_idempotent() {
    let html = r#"<main class="page"><h1 id="title">Hi</h1><p class="lead">x</p></main>"#;
    let css = r#"
        .page { margin: 0 }
        #title { font-family: "Merriweather"; animation: rise 1s }
        .lead:hover { color: red }
        .unused { color: blue; animation: sink 1s }
        @media (max-width: 500px) { .unused { display: none } .lead { font-size: 12px } }
        @keyframes rise { from { opacity: 0 } }
        @keyframes sink { from { opacity: 1 } }
        @font-face { font-family: "Merriweather"; src: url(m.woff2) }
        @font-face { font-family: "Comic Neue"; src: url(c.woff2) }
    "#;

    let once = reduce(html, css);
    let twice = reduce(html, &once);
    assert_eq!(once, twice);

    let report = generate(html, &once, &ReduceConfig::default())
        .unwrap()
        .report;
    assert_eq!(report.rules_removed, 0);
    assert_eq!(report.keyframes_removed, 0);
    assert_eq!(report.font_faces_removed, 0);
    assert_eq!(report.media_removed, 0);
}

#[test]
fn test_invalid_css_without_recovery_is_an_error() {
    let result = reduce_stylesheet("<div></div>", "..a{color:red}", &ReduceConfig::default());
    assert!(matches!(result, Err(BlazeError::CssParse(_))));

    let recovered = reduce_stylesheet(
        "<div></div>",
        "..a{color:red}",
        &ReduceConfig::default().with_error_recovery(true),
    );
    assert!(recovered.is_ok());
}

#[test]
fn test_template_contents_do_not_keep_rules() {
    let css = reduce(
        r#"<template><div class="tpl"></div></template>"#,
        ".tpl{color:red}",
    );
    assert!(!css.contains(".tpl"));
}

#[test]
fn test_strict_policy_reads_font_shorthand_with_line_height() {
    let css = r#"@font-face{font-family:"Roboto"} .a{font:12px/1.5 Roboto, sans-serif}"#;
    let strict = ReduceConfig::default().with_font_policy(FontMatchPolicy::Strict);

    let kept = reduce_stylesheet(r#"<div class="a"></div>"#, css, &strict).unwrap();
    assert!(kept.contains("@font-face"));

    let dropped = reduce_stylesheet(r#"<div class="z"></div>"#, css, &strict).unwrap();
    assert!(!dropped.contains("@font-face"));
}

#[test]
fn test_font_shorthand_weight_drives_descriptor_policy() {
    let css = r#"
        @font-face { font-family: "Roboto"; font-weight: 700; src: url(bold.woff2) }
        @font-face { font-family: "Roboto"; font-weight: 400; src: url(regular.woff2) }
        .a { font: bold 12px / 1.5 Roboto }
    "#;
    let reduced = reduce(r#"<div class="a"></div>"#, css);
    assert!(reduced.contains("bold.woff2"));
    assert!(!reduced.contains("regular.woff2"));
}

#[test]
fn test_starting_style_rules_are_filtered_and_keep_dependencies() {
    let css = "@keyframes pop{from{opacity:0}} @keyframes sink{from{opacity:1}} \
               @font-face{font-family:Inter;src:url(inter.woff2)} \
               @starting-style{.a{animation:pop 1s;font-family:Inter} .gone{animation:sink 1s}}";
    let reduced = reduce(r#"<div class="a"></div>"#, css);
    assert!(reduced.contains("@starting-style"));
    assert!(!reduced.contains(".gone"));
    assert!(reduced.contains("@keyframes pop"));
    assert!(!reduced.contains("sink"));
    assert!(reduced.contains("@font-face"));

    let dead = reduce(r#"<div class="z"></div>"#, css);
    assert!(!dead.contains(".a"));
    assert!(!dead.contains("pop"));
    assert!(!dead.contains("@font-face"));
}

#[test]
fn test_scope_rules_are_filtered_and_keep_dependencies() {
    let css = "@keyframes pop{from{opacity:0}} \
               @scope (.card){.title{animation:pop 1s} .gone{color:red}}";
    let reduced = reduce(r#"<div class="card"><h2 class="title"></h2></div>"#, css);
    assert!(reduced.contains("@scope"));
    assert!(reduced.contains(".title"));
    assert!(!reduced.contains(".gone"));
    assert!(reduced.contains("@keyframes pop"));

    let dead = reduce(r#"<div class="card"></div>"#, css);
    assert!(!dead.contains(".title"));
    assert!(!dead.contains("pop"));
}

#[test]
fn test_layer_blocks_are_filtered_and_keep_dependencies() {
    let css = r#"
        @font-face { font-family: "Lora"; src: url(lora.woff2) }
        @font-face { font-family: "Mono"; src: url(mono.woff2) }
        @layer base { .a { font-family: Lora } .gone { font-family: Mono } }
    "#;
    let reduced = reduce(r#"<p class="a"></p>"#, css);
    assert!(reduced.contains("@layer base"));
    assert!(!reduced.contains(".gone"));
    assert!(reduced.contains("lora.woff2"));
    assert!(!reduced.contains("mono.woff2"));
}
