//! Service-level scenarios over the in-memory store.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use people_registry::api::{
    age_on, CountryAddRequest, GenderOptions, PersonAddRequest, PersonUpdateRequest, SortOrder,
};
use people_registry::db::LocalRepository;
use people_registry::models::PersonId;
use people_registry::services::{CountriesService, PersonsService, ServiceError};

fn services() -> (PersonsService, CountriesService) {
    let repo = Arc::new(LocalRepository::new());
    (PersonsService::new(repo.clone()), CountriesService::new(repo))
}

fn maria() -> PersonAddRequest {
    PersonAddRequest {
        person_name: Some("Maria".to_string()),
        email: Some("m@x.com".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
        gender: Some(GenderOptions::Female),
        ..PersonAddRequest::default()
    }
}

#[tokio::test]
async fn test_added_person_is_listed_once_with_age() {
    let (persons, _) = services();

    let added = persons.add_person(maria()).await.unwrap();
    assert!(!added.person_id.is_nil());

    let all = persons.get_all_persons().await.unwrap();
    let matches: Vec<_> = all
        .iter()
        .filter(|p| {
            p.person_name.as_deref() == Some("Maria")
                && p.email.as_deref() == Some("m@x.com")
                && p.gender.as_deref() == Some("Female")
        })
        .collect();
    assert_eq!(matches.len(), 1);

    let today = Local::now().date_naive();
    let expected_age = age_on(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(), today);
    assert_eq!(matches[0].age, Some(expected_age));
    assert_eq!(matches[0], &added);
}

#[tokio::test]
async fn test_missing_required_fields_never_reach_the_store() {
    let (persons, _) = services();

    for request in [
        PersonAddRequest {
            person_name: None,
            ..maria()
        },
        PersonAddRequest {
            email: None,
            ..maria()
        },
        PersonAddRequest {
            gender: None,
            ..maria()
        },
    ] {
        let err = persons.add_person(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
    assert!(persons.get_all_persons().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_of_unknown_person_conflicts() {
    let (persons, _) = services();
    let request = PersonUpdateRequest {
        person_id: Some(PersonId::generate()),
        person_name: Some("Ghost".to_string()),
        email: Some("g@x.com".to_string()),
        gender: Some(GenderOptions::Other),
        ..PersonUpdateRequest::default()
    };

    let err = persons.update_person(request).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(ref msg) if msg == "Given person Id doesn't exist"));
}

#[tokio::test]
async fn test_update_round_trips_through_response() {
    let (persons, _) = services();
    let added = persons.add_person(maria()).await.unwrap();

    let mut request = added.to_person_update_request();
    request.address = Some("12 Rizal Ave".to_string());
    let updated = persons.update_person(request).await.unwrap();

    assert_eq!(updated.person_id, added.person_id);
    assert_eq!(updated.address.as_deref(), Some("12 Rizal Ave"));
    assert_eq!(updated.person_name, added.person_name);
}

#[tokio::test]
async fn test_unrecognized_search_field_returns_everything_in_order() {
    let (persons, _) = services();
    for (name, email) in [("Zed", "z@x.com"), ("Amy", "a@x.com"), ("Bob", "b@x.com")] {
        persons
            .add_person(PersonAddRequest {
                person_name: Some(name.to_string()),
                email: Some(email.to_string()),
                ..maria()
            })
            .await
            .unwrap();
    }

    let all = persons.get_all_persons().await.unwrap();
    let filtered = persons.get_filtered_persons("Salary", Some("Amy")).await.unwrap();
    assert_eq!(filtered, all);
}

#[tokio::test]
async fn test_sort_reverses_with_direction() {
    let (persons, _) = services();
    for (name, email) in [("carla", "c@x.com"), ("Amy", "a@x.com"), ("bob", "b@x.com")] {
        persons
            .add_person(PersonAddRequest {
                person_name: Some(name.to_string()),
                email: Some(email.to_string()),
                ..maria()
            })
            .await
            .unwrap();
    }
    let all = persons.get_all_persons().await.unwrap();

    let ascending = persons.get_sorted_persons(all.clone(), "PersonName", SortOrder::Asc);
    let again = persons.get_sorted_persons(ascending.clone(), "PersonName", SortOrder::Asc);
    let descending = persons.get_sorted_persons(all, "PersonName", SortOrder::Desc);

    let names = |list: &[people_registry::api::PersonResponse]| {
        list.iter()
            .map(|p| p.person_name.clone().unwrap_or_default())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&ascending), vec!["Amy", "bob", "carla"]);
    assert_eq!(ascending, again);
    let mut reversed = names(&descending);
    reversed.reverse();
    assert_eq!(reversed, names(&ascending));
}

#[tokio::test]
async fn test_delete_unknown_person_is_false() {
    let (persons, _) = services();
    assert!(!persons.delete_person(PersonId::generate()).await.unwrap());

    let added = persons.add_person(maria()).await.unwrap();
    assert!(persons.delete_person(added.person_id).await.unwrap());
    assert!(persons
        .get_person_by_person_id(added.person_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_country_names_are_unique_case_sensitively() {
    let (_, countries) = services();

    let japan = countries
        .add_country(CountryAddRequest::new("Japan"))
        .await
        .unwrap();
    let err = countries
        .add_country(CountryAddRequest::new("Japan"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    countries
        .add_country(CountryAddRequest::new("JAPAN"))
        .await
        .unwrap();
    let found = countries
        .get_country_by_country_name("Japan")
        .await
        .unwrap();
    assert_eq!(found, Some(japan));
    assert_eq!(countries.get_all_countries().await.unwrap().len(), 2);
}

/// Stores four people with mixed birth dates, newsletter choices and
/// countries (one of each left blank) and returns them in store order.
async fn mixed_people(
    persons: &PersonsService,
    countries: &CountriesService,
) -> Vec<people_registry::api::PersonResponse> {
    let mut country_ids = Vec::new();
    for name in ["brazil", "Chile", "Argentina"] {
        let country = countries
            .add_country(CountryAddRequest::new(name))
            .await
            .unwrap();
        country_ids.push(country.country_id);
    }

    let people = [
        ("Old", NaiveDate::from_ymd_opt(1960, 5, 1), true, Some(country_ids[0])),
        ("Young", NaiveDate::from_ymd_opt(2005, 3, 15), false, Some(country_ids[1])),
        ("Unknown", None, true, Some(country_ids[2])),
        ("Mid", NaiveDate::from_ymd_opt(1985, 7, 20), false, None),
    ];
    for (name, date_of_birth, receive_news_letters, country_id) in people {
        persons
            .add_person(PersonAddRequest {
                person_name: Some(name.to_string()),
                email: Some(format!("{}@x.com", name.to_lowercase())),
                date_of_birth,
                receive_news_letters,
                country_id,
                ..maria()
            })
            .await
            .unwrap();
    }
    persons.get_all_persons().await.unwrap()
}

fn sorted_names(
    persons: &PersonsService,
    all: &[people_registry::api::PersonResponse],
    sort_by: &str,
    order: SortOrder,
) -> Vec<String> {
    persons
        .get_sorted_persons(all.to_vec(), sort_by, order)
        .iter()
        .map(|p| p.person_name.clone().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_sort_by_date_of_birth_puts_missing_dates_first_ascending() {
    let (persons, countries) = services();
    let all = mixed_people(&persons, &countries).await;

    assert_eq!(
        sorted_names(&persons, &all, "DateOfBirth", SortOrder::Asc),
        vec!["Unknown", "Old", "Mid", "Young"]
    );
    assert_eq!(
        sorted_names(&persons, &all, "DateOfBirth", SortOrder::Desc),
        vec!["Young", "Mid", "Old", "Unknown"]
    );
}

#[tokio::test]
async fn test_sort_by_age_runs_opposite_to_birth_date() {
    let (persons, countries) = services();
    let all = mixed_people(&persons, &countries).await;

    assert_eq!(
        sorted_names(&persons, &all, "Age", SortOrder::Asc),
        vec!["Unknown", "Young", "Mid", "Old"]
    );
    assert_eq!(
        sorted_names(&persons, &all, "Age", SortOrder::Desc),
        vec!["Old", "Mid", "Young", "Unknown"]
    );
}

#[tokio::test]
async fn test_sort_by_newsletter_keeps_store_order_within_each_value() {
    let (persons, countries) = services();
    let all = mixed_people(&persons, &countries).await;

    assert_eq!(
        sorted_names(&persons, &all, "ReceiveNewsLetters", SortOrder::Asc),
        vec!["Young", "Mid", "Old", "Unknown"]
    );
    assert_eq!(
        sorted_names(&persons, &all, "ReceiveNewsLetters", SortOrder::Desc),
        vec!["Old", "Unknown", "Young", "Mid"]
    );
}

#[tokio::test]
async fn test_sort_by_country_ignores_case() {
    let (persons, countries) = services();
    let all = mixed_people(&persons, &countries).await;

    assert_eq!(
        sorted_names(&persons, &all, "Country", SortOrder::Asc),
        vec!["Mid", "Unknown", "Old", "Young"]
    );
    assert_eq!(
        sorted_names(&persons, &all, "Country", SortOrder::Desc),
        vec!["Young", "Old", "Unknown", "Mid"]
    );
}
