pub mod ticket_card;
