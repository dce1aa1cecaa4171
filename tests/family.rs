use kinship::application_impl::RealFamilyService;
use kinship::application_port::{FamilyError, FamilyService};
use kinship::cache::{ManualClock, TtlCache};
use kinship::domain_model::*;
use kinship::infra_memory::*;
use std::sync::Arc;
use std::time::Duration;

const MEMBERS_TTL: Duration = Duration::from_secs(300);

struct Fixture {
    service: RealFamilyService,
    profiles: Arc<MemoryProfileRepo>,
    notifier: Arc<RecordingNotificationSender>,
}

fn fixture() -> Fixture {
    let profiles = Arc::new(MemoryProfileRepo::new());
    let families = Arc::new(MemoryFamilyStore::new());
    let invites = Arc::new(MemoryFamilyInviteStore::new());
    let clock = Arc::new(ManualClock::new());
    let members_cache = Arc::new(TtlCache::new(MEMBERS_TTL, clock));
    let notifier = Arc::new(RecordingNotificationSender::new());
    let service = RealFamilyService::new(
        profiles.clone(),
        families,
        invites,
        members_cache,
        notifier.clone(),
    );
    Fixture {
        service,
        profiles,
        notifier,
    }
}

fn seed(fx: &Fixture, name: &str) -> UserId {
    let id = UserId::random();
    fx.profiles.upsert(UserProfile {
        id,
        display_name: name.to_owned(),
        email: format!("{name}@example.com"),
        avatar: None,
        last_seen: None,
    });
    id
}

#[tokio::test]
async fn invite_then_accept_adds_the_member_and_clears_invites() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    assert!(family.members.contains(&a));

    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    let invites = fx.service.pending_invites(b).await.unwrap();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0].family_name, "sharks");
    assert_eq!(invites[0].from_user, a);

    fx.service
        .accept_family_invite(b, family.id, a)
        .await
        .unwrap();

    let record = fx.service.get_family(family.id).await.unwrap().unwrap();
    assert!(record.members.contains(&a));
    assert!(record.members.contains(&b));
    assert!(fx.service.pending_invites(b).await.unwrap().is_empty());

    let kinds: Vec<NotificationKind> = fx.notifier.take().iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![NotificationKind::FamilyInvite, NotificationKind::FamilyAccepted]
    );
}

#[tokio::test]
async fn decline_clears_the_invite_without_joining() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    fx.service
        .decline_family_invite(b, family.id, a)
        .await
        .unwrap();

    let record = fx.service.get_family(family.id).await.unwrap().unwrap();
    assert!(!record.members.contains(&b));
    assert!(fx.service.pending_invites(b).await.unwrap().is_empty());

    let kinds: Vec<NotificationKind> = fx.notifier.take().iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![NotificationKind::FamilyInvite, NotificationKind::FamilyDeclined]
    );
}

#[tokio::test]
async fn duplicate_invite_is_a_noop() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    fx.service.send_family_invite(family.id, a, b).await.unwrap();

    assert_eq!(fx.service.pending_invites(b).await.unwrap().len(), 1);
    assert_eq!(fx.notifier.take().len(), 1);
}

#[tokio::test]
async fn self_invite_is_a_noop() {
    let fx = fixture();
    let a = seed(&fx, "a");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    fx.service.send_family_invite(family.id, a, a).await.unwrap();

    assert!(fx.service.pending_invites(a).await.unwrap().is_empty());
}

#[tokio::test]
async fn invite_preconditions_are_enforced() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");
    let outsider = seed(&fx, "outsider");

    let family = fx.service.create_family(a, "sharks").await.unwrap();

    let err = fx
        .service
        .send_family_invite(FamilyId::random(), a, b)
        .await
        .unwrap_err();
    assert!(matches!(err, FamilyError::FamilyNotFound));

    let err = fx
        .service
        .send_family_invite(family.id, outsider, b)
        .await
        .unwrap_err();
    assert!(matches!(err, FamilyError::NotMember));

    let err = fx
        .service
        .send_family_invite(family.id, a, a)
        .await
        .err();
    assert!(err.is_none()); // self-invite short-circuits before any check

    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    fx.service.accept_family_invite(b, family.id, a).await.unwrap();
    let err = fx
        .service
        .send_family_invite(family.id, a, b)
        .await
        .unwrap_err();
    assert!(matches!(err, FamilyError::AlreadyMember));

    let err = fx
        .service
        .send_family_invite(family.id, a, UserId::random())
        .await
        .unwrap_err();
    assert!(matches!(err, FamilyError::UserNotFound));
}

#[tokio::test]
async fn accept_without_an_invite_still_joins() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    fx.service
        .accept_family_invite(b, family.id, a)
        .await
        .unwrap();

    let record = fx.service.get_family(family.id).await.unwrap().unwrap();
    assert!(record.members.contains(&b));
}

#[tokio::test]
async fn creator_leaving_as_last_member_deletes_the_family() {
    let fx = fixture();
    let a = seed(&fx, "a");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    fx.service.leave_family(a, family.id).await.unwrap();

    assert!(fx.service.get_family(family.id).await.unwrap().is_none());
}

#[tokio::test]
async fn leaving_a_family_with_members_left_keeps_it_alive() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    fx.service.accept_family_invite(b, family.id, a).await.unwrap();

    fx.service.leave_family(b, family.id).await.unwrap();
    let record = fx.service.get_family(family.id).await.unwrap().unwrap();
    assert!(record.members.contains(&a));
    assert!(!record.members.contains(&b));

    // the creator leaving a family that still had another member at the
    // time of the last read does not delete it
    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    fx.service.accept_family_invite(b, family.id, a).await.unwrap();
    fx.service.leave_family(a, family.id).await.unwrap();
    let record = fx.service.get_family(family.id).await.unwrap().unwrap();
    assert!(record.members.contains(&b));
}

#[tokio::test]
async fn member_list_reflects_an_accept_without_force_refresh() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    let members = fx.service.family_members(family.id, false).await.unwrap();
    assert_eq!(members.len(), 1);
    assert!(members[0].is_creator);

    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    fx.service.accept_family_invite(b, family.id, a).await.unwrap();

    // accept invalidated the member cache
    let members = fx.service.family_members(family.id, false).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn unresolvable_members_are_dropped_from_the_list() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let family = fx.service.create_family(a, "sharks").await.unwrap();
    fx.service.send_family_invite(family.id, a, b).await.unwrap();
    fx.service.accept_family_invite(b, family.id, a).await.unwrap();

    fx.profiles.remove(b);

    let members = fx.service.family_members(family.id, true).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].profile.id, a);
    assert!(members[0].is_creator);
}

#[tokio::test]
async fn families_of_lists_only_memberships() {
    let fx = fixture();
    let a = seed(&fx, "a");
    let b = seed(&fx, "b");

    let first = fx.service.create_family(a, "first").await.unwrap();
    let second = fx.service.create_family(b, "second").await.unwrap();
    fx.service.send_family_invite(second.id, b, a).await.unwrap();
    fx.service.accept_family_invite(a, second.id, b).await.unwrap();

    let families = fx.service.families_of(a).await.unwrap();
    let ids: Vec<FamilyId> = families.iter().map(|f| f.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
    assert_eq!(fx.service.families_of(b).await.unwrap().len(), 1);
}
