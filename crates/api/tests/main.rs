mod handlers;
