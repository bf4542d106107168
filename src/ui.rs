use crate::models::AnalyticsSnapshot;

pub struct Package {
    pub platform: &'static str,
    pub title: &'static str,
    pub price: &'static str,
}

pub const PACKAGES: &[Package] = &[
    Package { platform: "Instagram", title: "1000 متابع", price: "5 KWD" },
    Package { platform: "Instagram", title: "5000 إعجاب", price: "8.500 KWD" },
    Package { platform: "TikTok", title: "10000 مشاهدة", price: "3 KWD" },
    Package { platform: "TikTok", title: "2000 متابع", price: "9.750 KWD" },
    Package { platform: "YouTube", title: "500 مشترك", price: "12 KWD" },
    Package { platform: "Snapchat", title: "1000 مشاهدة قصة", price: "4.250 KWD" },
];

pub fn render_storefront() -> String {
    let cards: String = PACKAGES
        .iter()
        .map(|package| {
            format!(
                r#"<article class="package" data-platform="{platform}" data-title="{title}" data-price="{price}">
        <span class="platform">{platform}</span>
        <h2>{title}</h2>
        <p class="price">{price}</p>
        <button class="buy-button" type="button">اطلب عبر واتساب</button>
      </article>"#,
                platform = escape_html(package.platform),
                title = escape_html(package.title),
                price = escape_html(package.price),
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ");

    STOREFRONT_HTML.replace("{{PACKAGES}}", &cards)
}

pub fn render_dashboard(snapshot: Option<&AnalyticsSnapshot>) -> String {
    let initial = snapshot
        .and_then(|snapshot| serde_json::to_string(snapshot).ok())
        .unwrap_or_else(|| "null".to_string());

    // Keep the embedded JSON from closing the script tag.
    DASHBOARD_HTML.replace("{{SNAPSHOT}}", &initial.replace("</", "<\\/"))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STOREFRONT_HTML: &str = concat!(
    r#"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Boostly</title>
  <style>"#,
    include_str!("ui.css"),
    r#"</style>
</head>
<body>
  <main>
    <header>
      <h1>باقات Boostly</h1>
      <p>اختر الباقة وأكمل الطلب عبر واتساب.</p>
    </header>
    <section class="grid">
      {{PACKAGES}}
    </section>
  </main>
  <script>
    document.querySelectorAll('.buy-button').forEach((button) => {
      button.addEventListener('click', async () => {
        const card = button.closest('.package');
        if (!card) {
          return;
        }
        const chat = window.open('', '_blank');
        try {
          const res = await fetch('/api/orders', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({
              platform: card.dataset.platform,
              title: card.dataset.title,
              price: card.dataset.price
            })
          });
          const data = await res.json();
          if (chat) {
            chat.location = data.whatsapp_url;
          } else {
            window.location = data.whatsapp_url;
          }
        } catch (err) {
          console.warn('order request failed', err);
          if (chat) {
            chat.close();
          }
        }
      });
    });
  </script>
</body>
</html>
"#
);

const DASHBOARD_HTML: &str = concat!(
    r#"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Boostly Analytics</title>
  <style>"#,
    include_str!("ui.css"),
    r#"</style>
</head>
<body>
  <main>
    <header>
      <h1>لوحة التحليلات</h1>
      <p id="status">بانتظار البيانات…</p>
    </header>
    <section class="grid">
      <div class="metric">الطلبات<strong id="orders">0</strong></div>
      <div class="metric">المبيعات<strong id="sales">0</strong></div>
      <div class="metric">الزيارات<strong id="visits">0</strong></div>
      <div class="metric">متوسط الطلب<strong id="avg">0</strong></div>
      <div class="metric">معدل التحويل<strong id="conversion">0%</strong></div>
    </section>
    <section class="panel">
      <h2>أحدث الطلبات</h2>
      <table>
        <thead><tr><th>الرقم</th><th>الباقة</th><th>الإجمالي</th><th>الحالة</th><th>التاريخ</th></tr></thead>
        <tbody id="orders-body"></tbody>
      </table>
    </section>
    <section class="panel">
      <h2>الاتجاه اليومي</h2>
      <table>
        <thead><tr><th>اليوم</th><th>الزيارات</th><th>الطلبات</th><th>المبيعات</th></tr></thead>
        <tbody id="trends-body"></tbody>
      </table>
    </section>
  </main>
  <script>
    const initial = {{SNAPSHOT}};

    const cell = (value) => {
      const td = document.createElement('td');
      td.textContent = value;
      return td;
    };

    const fillRows = (id, rows) => {
      const body = document.getElementById(id);
      body.replaceChildren(...rows.map((values) => {
        const tr = document.createElement('tr');
        values.forEach((value) => tr.appendChild(cell(value)));
        return tr;
      }));
    };

    const render = (analytics) => {
      const status = document.getElementById('status');
      if (!analytics) {
        status.textContent = 'لا توجد بيانات بعد';
        return;
      }
      const metrics = analytics.metrics || {};
      document.getElementById('orders').textContent = metrics.orders ?? 0;
      document.getElementById('sales').textContent = metrics.sales ?? 0;
      document.getElementById('visits').textContent = metrics.visits ?? 0;
      document.getElementById('avg').textContent = metrics.avgOrderValue ?? 0;
      document.getElementById('conversion').textContent = `${metrics.conversionRate ?? 0}%`;
      fillRows('orders-body', (analytics.recentOrders || []).map((order) => [
        order.id, order.package, order.total, order.status, order.date
      ]));
      fillRows('trends-body', (analytics.dailyTrends || []).map((entry) => [
        entry.label, entry.visits, entry.orders, entry.sales
      ]));
      status.textContent = 'محدثة';
    };

    render(initial);

    const events = new EventSource('/api/analytics/events');
    events.addEventListener('analytics-updated', (event) => {
      render(JSON.parse(event.data));
    });
  </script>
</body>
</html>
"#
);
