pub const DEFAULT_NUMBER: &str = "96560930205";

pub fn order_message(platform: &str, title: &str, price: &str) -> String {
    format!(
        "أهلاً Boostly،\n\nأود طلب الباقة التالية:\n- المنصة: *{platform}*\n- الباقة: *{title}*\n- السعر: *{price}*\n\nالرجاء تأكيد الطلب."
    )
}

pub fn chat_link(number: &str, message: &str) -> String {
    format!("https://wa.me/{number}?text={}", urlencoding::encode(message))
}
