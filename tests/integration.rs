//! Integration tests for rui.
//!
//! These tests exercise the public API from outside the crate: unit parsing,
//! CSS emission for views, theme resolution, and the session and application
//! round trips over an in-process bridge.

use std::f64::consts::PI;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use rui::app::{AppParams, Application};
use rui::css::view_css;
use rui::data::DataObject;
use rui::error::{self, Error};
use rui::property::{PropertyContainer, PropertyObject, Value};
use rui::session::{local_bridge, ClientInfo, LocalBridge, LocalClient, Session, SessionContent};
use rui::style::{
    BackgroundElement, BoundsProperty, ClipShape, GradientPoint, RadiusProperty, ShadowProperty,
};
use rui::theme::{Constants, Theme};
use rui::units::{AngleUnit, AngleUnitType, Color, SizeArg, SizeFunc, SizeUnit};
use rui::view::{View, ViewId, Widget, VIEW_SCHEMA};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn style() -> PropertyObject {
    PropertyObject::new(&VIEW_SCHEMA)
}

fn css(style: &PropertyObject) -> String {
    view_css(style, &()).finish()
}

fn constants(pairs: &[(&str, &str)]) -> std::collections::HashMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[test]
fn size_parse_and_emit() {
    let size = SizeUnit::parse("12.5pt").unwrap();
    assert_eq!(size, SizeUnit::pt(12.5));
    assert_eq!(size.to_string(), "12.5pt");
    assert_eq!(size.css_string(""), "12.5pt");
}

#[test]
fn size_text_round_trip() {
    let sizes = [
        SizeUnit::px(10.0),
        SizeUnit::em(1.5),
        SizeUnit::ex(2.0),
        SizeUnit::percent(50.0),
        SizeUnit::pt(12.5),
        SizeUnit::pc(3.0),
        SizeUnit::inch(1.0),
        SizeUnit::mm(20.0),
        SizeUnit::cm(2.5),
        SizeUnit::fr(1.0),
        SizeUnit::px(-4.0),
    ];
    for size in sizes {
        assert_eq!(SizeUnit::parse(&size.to_string()).unwrap(), size);
    }
    assert_eq!(SizeUnit::auto().to_string(), "auto");
    assert_eq!(SizeUnit::parse("auto").unwrap(), SizeUnit::auto());
}

#[test]
fn angle_conversions_agree() {
    let angles = [
        AngleUnit::deg(30.0),
        AngleUnit::rad(1.25),
        AngleUnit::pi_rad(0.5),
        AngleUnit::grad(100.0),
        AngleUnit::turn(0.75),
    ];
    let targets = [
        AngleUnitType::Radian,
        AngleUnitType::PiRadian,
        AngleUnitType::Degree,
        AngleUnitType::Gradian,
        AngleUnitType::Turn,
    ];
    for angle in angles {
        let direct = angle.to_radian().value;
        for target in targets {
            let through = angle.convert(target).to_radian().value;
            assert!((through - direct).abs() < 1e-9, "{angle} via {target:?}");
        }
    }
    assert!((AngleUnit::deg(180.0).to_radian().value - PI).abs() < 1e-12);
}

#[test]
fn color_parse_and_emit() {
    assert_eq!(Color::parse("#2196F3").unwrap().alpha(), 0xff);
    assert_eq!(Color::parse("#802196F3").unwrap().alpha(), 0x80);

    let half = Color::parse("rgba(10,20,30,.5)").unwrap();
    assert_eq!(half.css_string(), "rgba(10,20,30,0.50)");
    let opaque = Color::parse("rgba(10,20,30,1)").unwrap();
    assert_eq!(opaque.css_string(), "rgb(10,20,30)");
}

#[test]
fn size_functions_render_with_constants() {
    let table = constants(&[("a1", "120px")]);

    let min = SizeFunc::min([SizeUnit::percent(100.0).into(), SizeUnit::px(10.0).into()]).unwrap();
    assert_eq!(min.css_string(&table), "min(100%, 10px)");

    let sub = SizeFunc::sub(SizeUnit::percent(100.0), SizeArg::constant("@a1")).unwrap();
    assert_eq!(sub.css_string(&table), "calc(100% - 120px)");

    let scaled = SizeFunc::div(SizeFunc::mul(SizeArg::constant("@a1"), 3).unwrap(), 2).unwrap();
    let product = SizeFunc::mul(sub, scaled).unwrap();
    assert_eq!(
        product.css_string(&table),
        "calc((100% - 120px) * ((120px * 3) / 2))"
    );
}

// ---------------------------------------------------------------------------
// Composite properties
// ---------------------------------------------------------------------------

#[test]
fn linear_gradient_background() {
    let gradient = BackgroundElement::linear_gradient(
        AngleUnit::deg(45.0),
        vec![
            GradientPoint::new(Color::RED),
            GradientPoint::at(Color::BLUE, SizeUnit::percent(50.0)),
            GradientPoint::new(Color::GREEN),
        ],
        false,
    )
    .unwrap();
    let mut style = style();
    style.set("background", gradient);
    assert_eq!(
        css(&style),
        "background: linear-gradient(45deg, rgb(255,0,0), rgb(0,0,255) 50%, rgb(0,128,0));"
    );
}

#[test]
fn bounds_text_prunes_only_equal_sides() {
    let uniform = BoundsProperty::uniform(SizeUnit::px(4.0)).unwrap();
    assert_eq!(uniform.to_string(), "4px");

    let mixed = BoundsProperty::from_sides(
        SizeUnit::px(4.0),
        SizeUnit::px(8.0),
        SizeUnit::px(4.0),
        SizeUnit::px(8.0),
    )
    .unwrap();
    assert_eq!(mixed.to_string(), "4px,8px,4px,8px");

    let mut style = style();
    style.set("margin", mixed);
    assert_eq!(css(&style), "margin: 4px 8px 4px 8px;");
}

#[test]
fn radius_axes_collapse_into_corners() {
    let mut radius = RadiusProperty::new();
    radius.set("x", SizeUnit::px(6.0));
    radius.set("y", SizeUnit::px(6.0));
    assert_eq!(radius.get("top-left"), Some(Value::Size(SizeUnit::px(6.0))));
    assert_eq!(radius.get("top-left-x"), None);
}

#[test]
fn radius_x_then_y_on_a_view() {
    let mut style = style();
    style.set("radius-x", SizeUnit::px(10.0));
    style.set("radius-y", SizeUnit::px(20.0));
    assert_eq!(css(&style), "border-radius: 10px / 20px;");
}

#[test]
fn flex_emission() {
    let mut style = style();
    style.set("orientation", "start-to-end");
    style.set("list-wrap", "off");
    style.set("horizontal-align", "right");
    style.set("vertical-align", "center");
    assert_eq!(
        css(&style),
        "flex-flow: row; justify-content: flex-end; align-items: center;"
    );
}

#[test]
fn invisible_shadow_is_omitted() {
    let mut style = style();
    style.set("shadow", ShadowProperty::shadow(5, 5, 0, 0, "transparent").unwrap());
    assert_eq!(css(&style), "");
}

#[test]
fn degenerate_clip_shapes_emit_nothing() {
    let single = ClipShape::polygon(["10px"]).unwrap();
    assert_eq!(single.css_string(&()), None);

    let inset = ClipShape::inset("auto", "auto", "auto", "auto", None).unwrap();
    assert_eq!(inset.css_string(&()), None);

    let mut style = style();
    style.set("clip", inset);
    assert_eq!(css(&style), "");
}

#[test]
fn two_d_transform_without_origin() {
    let mut style = style();
    style.set("rotate", AngleUnit::deg(30.0));
    style.set("scale-x", 1.5);
    assert_eq!(css(&style), "transform: scale(1.5,1) rotate(30deg);");
}

// ---------------------------------------------------------------------------
// Themes and constants
// ---------------------------------------------------------------------------

#[test]
fn chained_constants_resolve() {
    let table = constants(&[("a1", "20mm"), ("a2", "@a1")]);
    assert_eq!(table.resolve_constants("@a2").as_deref(), Some("20mm"));
}

#[test]
fn constant_cycle_is_reported_once() {
    let table = constants(&[("b", "@b")]);
    let (resolved, errors) = error::capture(|| table.resolve_constants("@b"));
    assert_eq!(resolved, None);
    assert_eq!(errors, vec![Error::ConstantCycle("b".into())]);
}

#[test]
fn color_constant_reaches_the_view_css() {
    let table = constants(&[("accent", "#FF2196F3")]);
    let mut style = style();
    style.set("text-color", "@accent");
    assert_eq!(view_css(&style, &table).finish(), "color: rgb(33,150,243);");
}

#[test]
fn theme_text_round_trip() {
    let theme = Theme::parse(
        "theme { name = demo, constants = _ { gap = 8px }, styles = [ card { width = 10px } ] }",
    )
    .unwrap();
    assert_eq!(theme.name(), "demo");
    assert_eq!(theme.constant("gap", false), Some("8px"));
    let again = Theme::from_object(&theme.to_data_object()).unwrap();
    assert_eq!(again.constant("gap", false), Some("8px"));
    assert!(again.style("card").is_some());
}

#[test]
fn commented_theme_loads() {
    let theme = Theme::parse(
        "// demo theme\n\
         theme {\n\
           /* spacing */ constants = _ { gap = 8px },\n\
           styles = [ card { width = 10px } /* cards */ ],\n\
         }",
    )
    .unwrap();
    assert_eq!(theme.constant("gap", false), Some("8px"));
    assert!(theme.style("card").is_some());
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

fn labelled_root(session: &mut Session) -> Option<ViewId> {
    let root = session.set_root_view(View::new(Widget::ListLayout).with("id", "root"));
    session.append_view(root, View::new(Widget::TextView).with("id", "label").with("text", "hi"));
    Some(root)
}

fn started_session(theme: Option<Theme>) -> (Session, LocalClient) {
    init_logger();
    let (bridge, mut client) = local_bridge(16);
    let mut session = Session::new(1, bridge, ClientInfo::default());
    if let Some(theme) = theme {
        session.set_custom_theme(theme);
    }
    session.set_content(Box::new(labelled_root));
    session.start();
    client.drain_scripts();
    (session, client)
}

#[test]
fn css_changes_in_one_handler_make_one_script() {
    let (mut session, mut client) = started_session(None);
    let label = session.find_view("label").unwrap();
    session.batch(|session| {
        session.set_property(label, "width", SizeUnit::px(40.0));
        session.set_property(label, "opacity", 0.5);
    });

    let scripts = client.drain_scripts();
    assert_eq!(scripts.len(), 1);
    let script = &scripts[0];
    assert!(script.starts_with("var element = document.getElementById('id2'); if (element) {\n"));
    assert!(script.contains("element.style['width'] = '40px';\n"));
    assert!(script.contains("element.style['opacity'] = '0.5';\n"));
    assert!(!script.contains("innerHTML"));
    assert!(script.ends_with("scanElementsSize();}\n"));
}

#[test]
fn css_only_change_after_render_keeps_the_content() {
    let (mut session, mut client) = started_session(None);
    let label = session.find_view("label").unwrap();
    assert!(session.set_property(label, "opacity", 0.5));

    assert_eq!(
        client.drain_scripts(),
        vec![
            "var element = document.getElementById('id2'); if (element) {\n\
             element.style['opacity'] = '0.5';\n\
             scanElementsSize();}\n"
                .to_owned()
        ]
    );
}

#[test]
fn theme_constant_reaches_the_client() {
    let theme = Theme::parse("theme { constants = _ { accent = \"#FF2196F3\" } }").unwrap();
    let (mut session, mut client) = started_session(Some(theme));
    let label = session.find_view("label").unwrap();
    assert!(session.set_property(label, "text-color", "@accent"));

    let scripts = client.drain_scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("element.style['color'] = 'rgb(33,150,243)';"));
}

#[test]
fn rejected_value_keeps_the_old_one() {
    let (mut session, mut client) = started_session(None);
    let label = session.find_view("label").unwrap();
    session.set_property(label, "width", SizeUnit::px(40.0));
    client.drain_scripts();

    let (accepted, errors) = error::capture(|| session.set_property(label, "width", "wide"));
    assert!(!accepted);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        session.get_property(label, "width"),
        Some(Value::Size(SizeUnit::px(40.0)))
    );
    assert!(client.drain_scripts().is_empty());
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

fn clickable_root(session: &mut Session) -> Option<ViewId> {
    let mut button = View::new(Widget::Button).with("text", "Go");
    button.on_event("click", |session, id, _| {
        session.set_property(id, "width", SizeUnit::px(80.0));
        session.set_property(id, "opacity", 0.5);
    });
    Some(session.set_root_view(button))
}

fn application() -> Application {
    Application::new(AppParams::new(), || Box::new(clickable_root) as Box<dyn SessionContent>)
}

async fn connect(app: &Application) -> (Arc<LocalBridge>, LocalClient, tokio::task::JoinHandle<()>) {
    init_logger();
    let (bridge, mut client) = local_bridge(8);
    let reader = app.connect(bridge.clone());
    assert!(client.send("startSession { width = 800, height = 600 }").await);
    let script = client.next_script().await.unwrap();
    assert!(script.starts_with("sessionID = 1;\n"));
    (bridge, client, reader)
}

#[tokio::test]
async fn event_handler_answers_with_one_script() {
    let app = application();
    let (_bridge, mut client, _reader) = connect(&app).await;
    assert!(client.send("click { id = id1 }").await);
    let script = client.next_script().await.unwrap();
    assert_eq!(
        script,
        "var element = document.getElementById('id1'); if (element) {\n\
         element.style['opacity'] = '0.5';\n\
         element.style['width'] = '80px';\n\
         scanElementsSize();}\n"
    );
}

#[tokio::test]
async fn closed_session_is_not_recreated() {
    let app = application();
    let (bridge, client, reader) = connect(&app).await;
    assert!(client.send("session-close {}").await);
    reader.await.unwrap();
    assert!(bridge.is_closed());
    assert!(!app.contains_session(1));

    let (accepted, errors) =
        error::capture(|| app.dispatch(1, DataObject::new("click").with("id", "id1")));
    assert!(!accepted);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "session 1 not exists");
    assert_eq!(app.session_count(), 0);
}

#[test]
fn start_page_carries_the_title() {
    let app = Application::new(AppParams::new().with_title("Demo"), || {
        Box::new(clickable_root) as Box<dyn SessionContent>
    });
    let page = app.start_page();
    assert!(page.contains("<title>Demo</title>"));
    assert!(page.contains("id=\"ruiRootView\""));
}
