use dinebot_core::domain::restaurant::Restaurant;
use dinebot_core::domain::work_item::WorkItem;

use crate::mailer::Email;

pub fn subject(cuisine: &str) -> String {
    format!("Your {cuisine} Restaurant Suggestion")
}

pub fn summary(item: &WorkItem, restaurant: &Restaurant) -> String {
    format!(
        "Here are the details for the {cuisine} cuisine you asked for:\n\
         People: {people}\n\
         Date: {date}\n\
         Time: {time}\n\
         Restaurant Name: {name}\n\
         Restaurant Address: {address}\n\
         ZipCode: {zipcode}\n\
         Rating: {rating}\n\
         Reviews: {reviews}\n",
        cuisine = item.cuisine,
        people = item.number_of_people,
        date = item.date,
        time = item.dining_time,
        name = restaurant.name,
        address = restaurant.address,
        zipcode = restaurant.zipcode,
        rating = restaurant.rating,
        reviews = restaurant.review_count,
    )
}

/// The suggestion mail for one request, addressed to the slot-supplied email.
pub fn compose(item: &WorkItem, restaurant: &Restaurant) -> Email {
    Email {
        to: item.email.clone(),
        subject: subject(&item.cuisine),
        body: summary(item, restaurant),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use dinebot_core::domain::restaurant::{Restaurant, RestaurantId};
    use dinebot_core::domain::work_item::WorkItem;

    use super::compose;

    #[test]
    fn suggestion_lists_request_and_restaurant_details() {
        let item = WorkItem {
            location: "Manhattan".to_string(),
            cuisine: "Chinese".to_string(),
            date: "2030-05-01".to_string(),
            dining_time: "19:30".to_string(),
            number_of_people: "4".to_string(),
            phone_number: "2125550100".to_string(),
            email: "diner@example.com".to_string(),
            user_id: None,
        };
        let restaurant = Restaurant {
            id: RestaurantId("nom-wah".to_string()),
            name: "Nom Wah Tea Parlor".to_string(),
            category: "chinese".to_string(),
            address: "13 Doyers St".to_string(),
            city: "New York".to_string(),
            zipcode: "10013".to_string(),
            latitude: None,
            longitude: None,
            review_count: 2781,
            rating: Decimal::new(40, 1),
            inserted_at: Utc::now(),
        };

        let email = compose(&item, &restaurant);

        assert_eq!(email.to, "diner@example.com");
        assert_eq!(email.subject, "Your Chinese Restaurant Suggestion");
        assert_eq!(
            email.body,
            "Here are the details for the Chinese cuisine you asked for:\n\
             People: 4\n\
             Date: 2030-05-01\n\
             Time: 19:30\n\
             Restaurant Name: Nom Wah Tea Parlor\n\
             Restaurant Address: 13 Doyers St\n\
             ZipCode: 10013\n\
             Rating: 4.0\n\
             Reviews: 2781\n"
        );
    }
}
