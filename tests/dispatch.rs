mod common;

use common::{MockHttp, MockTelnet};
use denon_avr_control::features::{self, ENUMERATED, STEPPED, TOGGLES};
use denon_avr_control::{
    AvrError, Channel, Dispatch, Dispatcher, Feature, FeatureKind, HttpTransport, Notification,
    StateCache, Step, TelnetTransport, UnknownPolicy, Zone,
};
use std::collections::HashMap;
use std::sync::Arc;

struct Setup {
    dispatcher: Dispatcher,
    http: Arc<MockHttp>,
    telnet: Arc<MockTelnet>,
}

impl Setup {
    fn calls(&self) -> u32 {
        self.http.calls() + self.telnet.calls()
    }

    fn prime(&self, feature: &Feature, wire: &str) {
        self.dispatcher
            .cache()
            .apply(Notification::new(Zone::Main, feature.param, wire));
    }
}

fn setup() -> Setup {
    setup_with(HashMap::new())
}

fn setup_with(overrides: HashMap<String, UnknownPolicy>) -> Setup {
    common::init_tracing();
    let http = MockHttp::new();
    let telnet = MockTelnet::new();
    let dispatcher = Dispatcher::new(
        Arc::new(StateCache::new()),
        http.clone() as Arc<dyn HttpTransport>,
        Some(telnet.clone() as Arc<dyn TelnetTransport>),
        overrides,
    );
    Setup {
        dispatcher,
        http,
        telnet,
    }
}

fn toggle_wires(feature: &Feature) -> (&'static str, &'static str) {
    match feature.kind {
        FeatureKind::Toggle { on, off } => (on.wire, off.wire),
        _ => panic!("{} is not a toggle", feature.name),
    }
}

fn satisfy_requirement(setup: &Setup, feature: &Feature) {
    if let Some(requirement) = feature.requires {
        setup.dispatcher.cache().apply(Notification::new(
            Zone::Main,
            requirement.param,
            requirement.wire,
        ));
    }
}

// ========== Toggles ==========

#[tokio::test]
async fn test_toggle_target_cached_sends_nothing() {
    for feature in TOGGLES {
        let setup = setup();
        let (on, off) = toggle_wires(feature);

        setup.prime(feature, on);
        let result = setup
            .dispatcher
            .set_toggle(Zone::Main, feature, true)
            .await
            .unwrap();
        assert_eq!(result, Dispatch::Unchanged, "{}", feature.name);
        assert_eq!(setup.calls(), 0, "{}", feature.name);

        setup.prime(feature, off);
        let result = setup
            .dispatcher
            .set_toggle(Zone::Main, feature, false)
            .await
            .unwrap();
        assert_eq!(result, Dispatch::Unchanged, "{}", feature.name);
        assert_eq!(setup.calls(), 0, "{}", feature.name);
    }
}

#[tokio::test]
async fn test_toggle_opposite_cached_sends_once() {
    for feature in TOGGLES {
        let setup = setup();
        let (_, off) = toggle_wires(feature);

        setup.prime(feature, off);
        let result = setup
            .dispatcher
            .set_toggle(Zone::Main, feature, true)
            .await
            .unwrap();
        assert_eq!(result, Dispatch::Sent(Channel::Telnet), "{}", feature.name);
        assert_eq!(setup.calls(), 1, "{}", feature.name);
        assert_eq!(
            setup.telnet.last_command(),
            Some(feature.command_for(Zone::Main, "ON")),
        );
    }
}

#[tokio::test]
async fn test_toggle_flips_cached_value() {
    let setup = setup();
    setup.prime(&features::LFC, "ON");

    setup
        .dispatcher
        .toggle(Zone::Main, &features::LFC)
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("PSLFC OFF"));
}

#[tokio::test]
async fn test_toggle_treats_unknown_as_off() {
    let setup = setup();
    setup
        .dispatcher
        .toggle(Zone::Main, &features::LFC)
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("PSLFC ON"));
}

#[tokio::test]
async fn test_trigger_commands_carry_index() {
    let setup = setup();
    let trigger = features::trigger(2).unwrap();

    setup.prime(&trigger, "OFF");
    setup
        .dispatcher
        .set_toggle(Zone::Main, &trigger, true)
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("TR2 ON"));

    assert!(features::trigger(0).unwrap_err().is_domain());
    assert!(features::trigger(4).unwrap_err().is_domain());
}

// ========== Enumerations ==========

#[tokio::test]
async fn test_enumerated_invalid_value_is_domain_error() {
    for feature in ENUMERATED {
        let setup = setup();
        satisfy_requirement(&setup, feature);

        let err = setup
            .dispatcher
            .set_enum(Zone::Main, feature, "notavalidsetting")
            .await
            .unwrap_err();
        assert!(err.is_domain(), "{}", feature.name);

        // Regardless of what is cached
        let FeatureKind::Enumerated(tokens) = feature.kind else {
            panic!("{} is not enumerated", feature.name);
        };
        setup.prime(feature, tokens[0].wire);
        let err = setup
            .dispatcher
            .set_enum(Zone::Main, feature, "notavalidsetting")
            .await
            .unwrap_err();
        assert!(err.is_domain(), "{}", feature.name);
        assert_eq!(setup.calls(), 0, "{}", feature.name);
    }
}

#[tokio::test]
async fn test_enumerated_cached_and_changed_values() {
    for feature in ENUMERATED {
        let setup = setup();
        satisfy_requirement(&setup, feature);
        let FeatureKind::Enumerated(tokens) = feature.kind else {
            panic!("{} is not enumerated", feature.name);
        };

        setup.prime(feature, tokens[0].wire);
        let result = setup
            .dispatcher
            .set_enum(Zone::Main, feature, tokens[0].label)
            .await
            .unwrap();
        assert_eq!(result, Dispatch::Unchanged, "{}", feature.name);
        assert_eq!(setup.calls(), 0, "{}", feature.name);

        let result = setup
            .dispatcher
            .set_enum(Zone::Main, feature, tokens[1].label)
            .await
            .unwrap();
        assert!(result.was_sent(), "{}", feature.name);
        assert_eq!(setup.calls(), 1, "{}", feature.name);
        assert_eq!(
            setup.telnet.last_command(),
            Some(feature.command_for(Zone::Main, tokens[1].wire))
        );
    }
}

// ========== Zone scope ==========

#[tokio::test]
async fn test_receiver_wide_features_compare_against_main_from_any_zone() {
    for feature in TOGGLES.iter().chain(ENUMERATED).filter(|f| !f.zoned) {
        let setup = setup();
        satisfy_requirement(&setup, feature);
        let (wire, label) = match feature.kind {
            FeatureKind::Toggle { on, .. } => (on.wire, on.label),
            FeatureKind::Enumerated(tokens) => (tokens[0].wire, tokens[0].label),
            FeatureKind::Numeric(_) => unreachable!(),
        };
        setup.prime(feature, wire);

        for zone in [Zone::Zone2, Zone::Zone3] {
            let result = setup.dispatcher.set_enum(zone, feature, label).await.unwrap();
            assert_eq!(result, Dispatch::Unchanged, "{} {}", feature.name, zone);
        }
        assert_eq!(setup.calls(), 0, "{}", feature.name);
    }
}

#[tokio::test]
async fn test_receiver_wide_steps_respect_main_limits_from_any_zone() {
    for feature in STEPPED {
        assert!(!feature.zoned, "{}", feature.name);
        let domain = feature.numeric().unwrap();
        let setup = setup();

        setup.prime(feature, &domain.format(domain.max));
        let result = setup
            .dispatcher
            .step(Zone::Zone2, feature, Step::Up)
            .await
            .unwrap();
        assert_eq!(result, Dispatch::Unchanged, "{}", feature.name);
        assert_eq!(
            setup.dispatcher.number_value(Zone::Zone3, feature),
            Some(domain.max)
        );
        assert_eq!(setup.calls(), 0, "{}", feature.name);
    }
}

#[tokio::test]
async fn test_zoned_features_keep_per_zone_values() {
    let setup = setup();
    setup.prime(&features::MUTE, "ON");

    let result = setup
        .dispatcher
        .set_toggle(Zone::Zone2, &features::MUTE, true)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Sent(Channel::Telnet));
    assert_eq!(setup.telnet.last_command().as_deref(), Some("Z2MUON"));
}

// ========== Numeric ==========

#[tokio::test]
async fn test_step_is_noop_at_limits() {
    for feature in STEPPED {
        let domain = feature.numeric().unwrap();

        let setup = setup();
        setup.prime(feature, &domain.format(domain.max));
        let result = setup
            .dispatcher
            .step(Zone::Main, feature, Step::Up)
            .await
            .unwrap();
        assert_eq!(result, Dispatch::Unchanged, "{}", feature.name);
        assert_eq!(setup.calls(), 0, "{}", feature.name);

        setup.prime(feature, &domain.format(domain.min));
        let result = setup
            .dispatcher
            .step(Zone::Main, feature, Step::Down)
            .await
            .unwrap();
        assert_eq!(result, Dispatch::Unchanged, "{}", feature.name);
        assert_eq!(setup.calls(), 0, "{}", feature.name);
    }
}

#[tokio::test]
async fn test_step_inside_range_sends_once() {
    for feature in STEPPED {
        let domain = feature.numeric().unwrap();

        let setup = setup();
        setup.prime(feature, &domain.format(domain.min));
        setup
            .dispatcher
            .step(Zone::Main, feature, Step::Up)
            .await
            .unwrap();
        assert_eq!(setup.calls(), 1, "{}", feature.name);
        assert_eq!(
            setup.telnet.last_command(),
            Some(feature.command_for(Zone::Main, "UP"))
        );

        setup.prime(feature, &domain.format(domain.max));
        setup
            .dispatcher
            .step(Zone::Main, feature, Step::Down)
            .await
            .unwrap();
        assert_eq!(setup.calls(), 2, "{}", feature.name);
        assert_eq!(
            setup.telnet.last_command(),
            Some(feature.command_for(Zone::Main, "DOWN"))
        );
    }
}

#[tokio::test]
async fn test_set_number_formats_fixed_width() {
    let setup = setup();
    setup
        .dispatcher
        .set_number(Zone::Main, &features::CONTAINMENT_AMOUNT, 3)
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("PSCNTAMT 03"));

    setup
        .dispatcher
        .set_number(Zone::Zone2, &features::SLEEP, 30)
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("Z2SLP030"));
}

#[tokio::test]
async fn test_set_number_compares_numerically() {
    let setup = setup();
    setup.prime(&features::CONTAINMENT_AMOUNT, "03");

    let result = setup
        .dispatcher
        .set_number(Zone::Main, &features::CONTAINMENT_AMOUNT, 3)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Unchanged);
    assert_eq!(setup.calls(), 0);
}

#[tokio::test]
async fn test_set_number_reject_and_clamp() {
    let setup = setup();

    let err = setup
        .dispatcher
        .set_number(Zone::Main, &features::CONTAINMENT_AMOUNT, 8)
        .await
        .unwrap_err();
    assert!(err.is_domain());
    let err = setup
        .dispatcher
        .set_number(Zone::Main, &features::SLEEP, 0)
        .await
        .unwrap_err();
    assert!(err.is_domain());
    assert_eq!(setup.calls(), 0);

    setup
        .dispatcher
        .set_number(Zone::Main, &features::DELAY, 900)
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("PSDELAY 500"));
}

#[tokio::test]
async fn test_set_off() {
    let setup = setup();
    setup
        .dispatcher
        .set_off(Zone::Main, &features::SLEEP)
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("SLPOFF"));

    setup.prime(&features::SLEEP, "OFF");
    let result = setup
        .dispatcher
        .set_off(Zone::Main, &features::SLEEP)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Unchanged);

    let err = setup
        .dispatcher
        .set_off(Zone::Main, &features::DELAY)
        .await
        .unwrap_err();
    assert!(err.is_domain());
}

// ========== Unknown state ==========

#[tokio::test]
async fn test_unknown_state_sends_by_default() {
    let setup = setup();

    let result = setup
        .dispatcher
        .set_toggle(Zone::Main, &features::LFC, true)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Sent(Channel::Telnet));

    let result = setup
        .dispatcher
        .step(Zone::Main, &features::CONTAINMENT_AMOUNT, Step::Up)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Sent(Channel::Telnet));
    assert_eq!(setup.calls(), 2);
}

#[tokio::test]
async fn test_unknown_state_assume_current_override() {
    let overrides = HashMap::from([
        ("lfc".to_string(), UnknownPolicy::AssumeCurrent),
        ("containment_amount".to_string(), UnknownPolicy::AssumeCurrent),
    ]);
    let setup = setup_with(overrides);

    let result = setup
        .dispatcher
        .set_toggle(Zone::Main, &features::LFC, true)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Unchanged);
    let result = setup
        .dispatcher
        .step(Zone::Main, &features::CONTAINMENT_AMOUNT, Step::Up)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Unchanged);
    assert_eq!(setup.calls(), 0);

    // Features without an override keep the catalog default
    let result = setup
        .dispatcher
        .set_toggle(Zone::Main, &features::NEURAL_X, true)
        .await
        .unwrap();
    assert!(result.was_sent());

    // Once known, the policy no longer applies
    setup.prime(&features::LFC, "OFF");
    let result = setup
        .dispatcher
        .set_toggle(Zone::Main, &features::LFC, true)
        .await
        .unwrap();
    assert!(result.was_sent());
}

// ========== Transport precedence ==========

#[tokio::test]
async fn test_unhealthy_telnet_falls_back_to_http_command() {
    let setup = setup();
    setup.telnet.set_healthy(false);

    let result = setup
        .dispatcher
        .set_toggle(Zone::Main, &features::LFC, true)
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Sent(Channel::HttpCommand));
    assert_eq!(setup.telnet.calls(), 0);
    assert_eq!(setup.http.last_command().as_deref(), Some("PSLFC ON"));
}

#[tokio::test]
async fn test_disconnected_telnet_falls_back_to_appcommand() {
    let setup = setup();
    setup.telnet.set_connected(false);

    let result = setup
        .dispatcher
        .set_enum(Zone::Main, &features::MULTI_EQ, "Reference")
        .await
        .unwrap();
    assert_eq!(result, Dispatch::Sent(Channel::AppCommand));
    assert_eq!(setup.calls(), 1);

    let sent = setup.http.last_appcommand().unwrap();
    assert_eq!(sent.name, "SetAudyssey");
    assert_eq!(sent.params[0].name, "multeq");
    assert_eq!(sent.params[0].text, "3");
}

#[tokio::test]
async fn test_appcommand_rejection_is_an_error() {
    let setup = setup();
    setup.telnet.set_connected(false);
    setup.http.respond_with("<rx><cmd>NG</cmd></rx>");

    let err = setup
        .dispatcher
        .set_toggle(Zone::Main, &features::DYNAMIC_EQ, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AvrError::AppCommandFailed { .. }));
    assert_eq!(setup.http.calls(), 1);
}

// ========== Preconditions and errors ==========

#[tokio::test]
async fn test_reference_level_requires_dynamic_eq() {
    let setup = setup();

    let err = setup
        .dispatcher
        .set_enum(Zone::Main, &features::REF_LEVEL_OFFSET, "+5dB")
        .await
        .unwrap_err();
    assert!(matches!(err, AvrError::Precondition(_)));

    setup.prime(&features::DYNAMIC_EQ, "OFF");
    let err = setup
        .dispatcher
        .set_enum(Zone::Main, &features::REF_LEVEL_OFFSET, "+5dB")
        .await
        .unwrap_err();
    assert!(matches!(err, AvrError::Precondition(_)));
    assert_eq!(setup.calls(), 0);

    setup.prime(&features::DYNAMIC_EQ, "ON");
    setup
        .dispatcher
        .set_enum(Zone::Main, &features::REF_LEVEL_OFFSET, "+5dB")
        .await
        .unwrap();
    assert_eq!(setup.telnet.last_command().as_deref(), Some("PSREFLEV 5"));
}

#[tokio::test]
async fn test_transport_error_propagates_without_touching_cache() {
    let setup = setup();
    setup
        .telnet
        .fail
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let err = setup
        .dispatcher
        .set_toggle(Zone::Main, &features::LFC, true)
        .await
        .unwrap_err();
    assert!(matches!(err, AvrError::ConnectionClosed));
    assert_eq!(setup.telnet.calls(), 1);
    assert_eq!(setup.http.calls(), 0);
    assert_eq!(setup.dispatcher.cache().get(Zone::Main, features::LFC.param), None);
}

#[tokio::test]
async fn test_successful_send_does_not_update_cache() {
    let setup = setup();
    setup.prime(&features::LFC, "OFF");

    setup
        .dispatcher
        .set_toggle(Zone::Main, &features::LFC, true)
        .await
        .unwrap();
    assert_eq!(
        setup.dispatcher.cache().get(Zone::Main, features::LFC.param).as_deref(),
        Some("OFF")
    );
}
